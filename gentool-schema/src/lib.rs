// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Schema documents for the gentool interface compiler.
//!
//! A document describes one enum or one interface (class). Normalization
//! validates it and fills in every field the author left out, recording for
//! each whether it was declared or generated. Emitters only ever see the
//! normalized form.

mod common;
mod document;
mod enumeration;
mod error;
mod interface;
mod keyword;
mod lint;
mod name;
mod overridable;
mod reader;
mod registry;

use std::path::Path;

pub use document::{DocumentWriter, PROVENANCE_SUFFIX};
pub use enumeration::{Constant, EnumDef, normalize_enum};
pub use error::{Error, Result};
pub use interface::{
    Accessor, Assignment, ClassDef, Constructor, ConstructorKind, Destructor, EqualityOperator,
    HashOperator, InitializedProperty, OperatorProperty, Property, ToStringOperator,
    normalize_class,
};
pub use keyword::{Definition, EnumKind, Keyword, MethodMode, Visibility};
pub use lint::{Warning, coherence_warnings, unknown_keys};
pub use name::Name;
pub use overridable::Overridable;
pub use registry::{Entity, Registry, TypeIndex, declared_name};
use serde_json::Value;

/// Parse a schema document from a file.
pub fn read_document(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();
    parse_document(&content, &filename)
}

/// Parse a schema document from a string, naming it `filename` in errors.
pub fn parse_document(content: &str, filename: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| Error::parse(e, content, filename))
}

/// Check that a document file is named after the entity it declares,
/// ignoring case and the `.json` suffix.
pub fn check_file_name(def_name: &Name, file_stem: &str) -> Result<()> {
    if def_name.canonical().eq_ignore_ascii_case(file_stem) {
        Ok(())
    } else {
        Err(Error::invalid_field_value(
            "name",
            def_name.canonical(),
            format!("the document file is named '{file_stem}.json'"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_document_reports_location() {
        let err = parse_document("{\n  \"name\": }", "point.json").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_read_document_missing_file() {
        let dir = std::env::temp_dir().join("gentool-schema-missing-document");
        let err = read_document(dir.join("nope.json")).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_check_file_name_ignores_case() {
        let def = normalize_enum(&json!({ "name": "landmark_type" })).unwrap();
        assert!(check_file_name(&def.name, "Landmark_Type").is_ok());
        let err = check_file_name(&def.name, "landmark").unwrap_err();
        assert_eq!(err.key(), Some("name"));
    }
}
