//! Generate command report data structures.

use std::path::PathBuf;

use super::{
    document::{DocumentReport, DocumentStatus},
    output::{Output, Report},
};

/// Report data from a generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// One entry per scanned document, enums first.
    pub documents: Vec<DocumentReport>,
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug, Default)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    /// Files whose content changed.
    pub written: Vec<PathBuf>,
    /// Files left untouched because their content was already current.
    pub unchanged: Vec<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug, Default)]
pub struct PreviewResult {
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl GenerateReport {
    pub fn failed_count(&self) -> usize {
        self.documents.iter().filter(|d| d.is_failed()).count()
    }

    /// Whether every document generated.
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        if let GenerationResult::Preview(preview) = &self.result {
            for file in &preview.files {
                out.divider(&file.path);
                out.preformatted(&file.content);
            }
        }

        for document in &self.documents {
            for warning in &document.warnings {
                out.warning(&format!("{}: {}", document.file_name, warning));
            }
            match &document.status {
                DocumentStatus::Succeeded => out.preformatted(&format!(
                    "Generated '{}' {} code.",
                    document.file_name,
                    document.kind_label()
                )),
                DocumentStatus::Failed(diagnostic) => out.error(&format!(
                    "Failed to generate '{}' {} code.\n{}",
                    document.file_name,
                    document.kind_label(),
                    diagnostic
                )),
            }
        }

        out.newline();
        match &self.result {
            GenerationResult::Written(written) => {
                if !written.written.is_empty() {
                    out.section(&format!("Written to {}", written.output_dir.display()));
                    for path in &written.written {
                        out.added_item(&path.display().to_string());
                    }
                    out.newline();
                }
                out.key_value("Written", &written.written.len().to_string());
                out.key_value("Unchanged", &written.unchanged.len().to_string());
            }
            GenerationResult::Preview(preview) => {
                out.divider("Summary");
                out.preformatted(&format!("{} files would be generated", preview.files.len()));
            }
        }
        out.key_value("Failed", &self.failed_count().to_string());
    }
}

#[cfg(test)]
mod tests {
    use gentool_core::EntityKind;

    use super::*;
    use crate::reports::RecordedOutput;

    fn document(file_name: &str, kind: EntityKind, status: DocumentStatus) -> DocumentReport {
        DocumentReport {
            file_name: file_name.to_string(),
            kind,
            warnings: Vec::new(),
            status,
        }
    }

    #[test]
    fn test_render_logs_one_line_per_document() {
        let report = GenerateReport {
            documents: vec![
                document("Mode.json", EntityKind::Enum, DocumentStatus::Succeeded),
                document("Point.json", EntityKind::Class, DocumentStatus::Succeeded),
                document(
                    "Broken.json",
                    EntityKind::Class,
                    DocumentStatus::Failed("missing 'name' key".to_string()),
                ),
            ],
            result: GenerationResult::Written(WrittenResult {
                output_dir: PathBuf::from("out"),
                written: vec![PathBuf::from("out/include/Posemesh/Point.hpp")],
                unchanged: vec![PathBuf::from("out/include/Posemesh/Mode.hpp")],
            }),
        };
        assert!(!report.is_success());

        let mut out = RecordedOutput::default();
        report.render(&mut out);
        let text = out.text();
        assert!(text.contains("Generated 'Mode.json' enum code."));
        assert!(text.contains("Generated 'Point.json' interface code."));
        assert!(text.contains("error: Failed to generate 'Broken.json' interface code.\nmissing 'name' key"));
        assert!(text.contains("Written: 1\nUnchanged: 1\nFailed: 1"));
    }

    #[test]
    fn test_render_preview() {
        let report = GenerateReport {
            documents: vec![document("Mode.json", EntityKind::Enum, DocumentStatus::Succeeded)],
            result: GenerationResult::Preview(PreviewResult {
                files: vec![PreviewFile {
                    path: "include/Posemesh/Mode.hpp".to_string(),
                    content: "// mode".to_string(),
                }],
            }),
        };
        assert!(report.is_success());

        let mut out = RecordedOutput::default();
        report.render(&mut out);
        assert_eq!(out.lines[0], "── include/Posemesh/Mode.hpp ──");
        assert!(out.text().contains("1 files would be generated"));
    }
}
