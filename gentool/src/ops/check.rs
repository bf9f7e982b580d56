//! Check operation - normalization without emission.

use std::path::Path;

use eyre::Result;

use super::documents;
use crate::reports::CheckReport;

/// Execute the check operation.
pub fn check(input_dir: &Path) -> Result<CheckReport> {
    let documents = documents::scan(input_dir)?;
    let normalized = documents::normalize_all(&documents);
    Ok(CheckReport {
        input_dir: input_dir.to_path_buf(),
        documents: normalized.reports,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_check_reports_errors_and_warnings() {
        let temp = TempDir::new().unwrap();
        let interfaces = temp.path().join("interface");
        fs::create_dir_all(&interfaces).unwrap();
        fs::write(interfaces.join("point.json"), r#"{ "name": "point", "extra": 1 }"#).unwrap();
        fs::write(
            interfaces.join("shape.json"),
            r#"{ "name": "shape", "properties": [{ "name": "origin", "type": "CLASS:vertex" }] }"#,
        )
        .unwrap();

        let report = check(temp.path()).unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.warning_count(), 1);
        assert!(!report.documents[0].is_failed());
        assert!(report.documents[1].is_failed());
    }
}
