//! Normalize operation - the fully explicit form of one document.

use std::path::Path;

use eyre::{Result, WrapErr, eyre};
use gentool_schema::{DocumentWriter, read_document};

use super::documents::{self, Document, render_diagnostic};
use crate::reports::NormalizeReport;

/// Options for the normalize operation.
pub struct NormalizeOptions<'a> {
    pub file: &'a Path,
    /// Input root whose documents resolve type references, if it exists.
    pub input_dir: &'a Path,
    /// Whether to write `.gen` provenance markers.
    pub provenance: bool,
}

/// Execute the normalize operation.
pub fn normalize(opts: NormalizeOptions<'_>) -> Result<NormalizeReport> {
    let kind = Document::kind_of(opts.file);
    let mut known = if opts.input_dir.is_dir() {
        documents::scan(opts.input_dir)?
    } else {
        Vec::new()
    };
    known.push(Document::read(opts.file.to_path_buf(), kind));
    let (index, _) = documents::index(&known);

    let value = read_document(opts.file).map_err(|error| eyre!("{}", render_diagnostic(error.as_ref())))?;
    let stem = opts
        .file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    let (entity, warnings) = documents::normalize_document(&value, kind, stem, &index)
        .map_err(|error| eyre!("{}", render_diagnostic(error.as_ref())))?;

    let writer = DocumentWriter::new().with_provenance(opts.provenance);
    let document = serde_json::to_string_pretty(&entity.document(&writer))
        .wrap_err("Failed to serialize the normalized document")?;
    Ok(NormalizeReport {
        warnings: warnings.iter().map(ToString::to_string).collect(),
        document,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_normalize_with_provenance() {
        let temp = TempDir::new().unwrap();
        let enums = temp.path().join("enum");
        let interfaces = temp.path().join("interface");
        fs::create_dir_all(&enums).unwrap();
        fs::create_dir_all(&interfaces).unwrap();
        fs::write(enums.join("mode.json"), r#"{ "name": "mode" }"#).unwrap();
        let file = interfaces.join("widget.json");
        fs::write(&file, r#"{ "name": "widget", "properties": [{ "name": "mode", "type": "ENUM:mode" }] }"#).unwrap();

        let report = normalize(NormalizeOptions {
            file: &file,
            input_dir: temp.path(),
            provenance: true,
        })
        .unwrap();
        assert!(report.warnings.is_empty());

        let value: serde_json::Value = serde_json::from_str(&report.document).unwrap();
        assert_eq!(value["name"], "widget");
        assert_eq!(value["name.gen"], false);
        assert_eq!(value["static.gen"], true);
    }

    #[test]
    fn test_normalize_reports_schema_errors() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("point.json");
        fs::write(&file, r#"{ "properties": [] }"#).unwrap();

        let err = normalize(NormalizeOptions {
            file: &file,
            input_dir: &temp.path().join("missing"),
            provenance: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("missing 'name' key"));
    }
}
