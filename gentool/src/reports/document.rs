//! Per-document outcome shared by the generate and check reports.

use gentool_core::EntityKind;

/// What happened to one schema document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    /// File name, e.g. `Point.json`.
    pub file_name: String,
    pub kind: EntityKind,
    /// Non-fatal diagnostics.
    pub warnings: Vec<String>,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Succeeded,
    /// Rendered diagnostic of the failure.
    Failed(String),
}

impl DocumentReport {
    pub fn new(file_name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            warnings: Vec::new(),
            status: DocumentStatus::Succeeded,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed(_))
    }

    /// `enum` or `interface`, as used in log lines.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            EntityKind::Enum => "enum",
            EntityKind::Class => "interface",
        }
    }

    pub fn fail(&mut self, diagnostic: String) {
        self.status = DocumentStatus::Failed(diagnostic);
    }
}
