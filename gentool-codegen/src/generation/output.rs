use std::path::PathBuf;

use gentool_core::{EntityKind, File};

/// Text produced for one entity by one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub header: String,
    /// Enums produce headers only.
    pub source: Option<String>,
}

impl Emitted {
    pub fn header_only(header: String) -> Self {
        Self { header, source: None }
    }

    pub fn with_source(header: String, source: String) -> Self {
        Self {
            header,
            source: Some(source),
        }
    }

    /// Pair the emitted text with its output paths, relative to the
    /// output root.
    pub fn into_files(self, header_path: PathBuf, source_path: PathBuf) -> Vec<File> {
        let mut files = vec![File::new(header_path, self.header)];
        if let Some(source) = self.source {
            files.push(File::new(source_path, source));
        }
        files
    }
}

/// First line of every generated file.
pub fn banner(kind: EntityKind, document_name: &str) -> String {
    let kind = match kind {
        EntityKind::Enum => "enum",
        EntityKind::Class => "interface",
    };
    format!(
        "/* This code is automatically generated from {document_name}.json {kind}. Do not modify it manually as it will be overwritten! */"
    )
}
