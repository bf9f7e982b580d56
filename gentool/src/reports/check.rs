//! Check command report data structures.

use std::path::PathBuf;

use super::{
    document::{DocumentReport, DocumentStatus},
    output::{Output, Report},
};

/// Report data from normalizing every document without emitting.
#[derive(Debug)]
pub struct CheckReport {
    pub input_dir: PathBuf,
    pub documents: Vec<DocumentReport>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.documents.iter().all(|d| !d.is_failed())
    }

    pub fn warning_count(&self) -> usize {
        self.documents.iter().map(|d| d.warnings.len()).sum()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for document in &self.documents {
            if let DocumentStatus::Failed(diagnostic) = &document.status {
                out.error(&format!("{}: {}", document.file_name, diagnostic));
            }
            for warning in &document.warnings {
                out.warning(&format!("{}: {}", document.file_name, warning));
            }
        }

        let failed = self.documents.iter().filter(|d| d.is_failed()).count();
        if failed > 0 || self.warning_count() > 0 {
            out.newline();
        }

        if self.is_valid() {
            out.preformatted(&format!(
                "✓ {} documents in {} are valid",
                self.documents.len(),
                self.input_dir.display()
            ));
        } else {
            out.preformatted(&format!("✗ {} of {} documents failed", failed, self.documents.len()));
        }
    }
}
