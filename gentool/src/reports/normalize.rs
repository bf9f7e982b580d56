//! Normalize command report.

use super::output::{Output, Report};

/// The fully explicit form of one document.
#[derive(Debug)]
pub struct NormalizeReport {
    pub warnings: Vec<String>,
    /// Pretty-printed JSON.
    pub document: String,
}

impl Report for NormalizeReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }
        out.preformatted(&self.document);
    }
}
