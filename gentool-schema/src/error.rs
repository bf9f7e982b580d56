use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for schema operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(gentool::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{document}'")]
    #[diagnostic(code(gentool::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        document: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing '{key}' key")]
    #[diagnostic(code(gentool::missing_field), help("add the '{key}' key to the document"))]
    MissingField { key: String },

    #[error("invalid '{key}' key type, expected {expected} but found {found}")]
    #[diagnostic(code(gentool::invalid_field_type))]
    InvalidFieldType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid '{key}' key value '{value}'")]
    #[diagnostic(code(gentool::invalid_field_value), help("{reason}"))]
    InvalidFieldValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown type reference '{reference}' in '{key}'")]
    #[diagnostic(
        code(gentool::unknown_type_reference),
        help("declare '{reference}' in an enum or interface document, or fix the spelling")
    )]
    UnknownTypeReference { key: String, reference: String },

    #[error("invalid identifier '{name}' in '{key}'")]
    #[diagnostic(
        code(gentool::invalid_identifier),
        help("{reason}. Use letters and digits in '_'-separated segments that start with a letter.")
    )]
    InvalidIdentifier {
        key: String,
        name: String,
        reason: String,
    },

    #[error("duplicate constant value {value} in '{key}'")]
    #[diagnostic(
        code(gentool::duplicate_constant_value),
        help("'{second}' reuses the value of '{first}'")
    )]
    DuplicateConstantValue {
        key: String,
        value: i64,
        first: String,
        second: String,
    },

    #[error("flag enum '{name}' mixes explicit and generated constant values in '{key}'")]
    #[diagnostic(
        code(gentool::flag_enum_value_mixing),
        help("give every constant of a flag enum a value, or none of them")
    )]
    FlagEnumValueMixing { key: String, name: String },
}

impl Error {
    pub fn missing_field(key: impl Into<String>) -> Box<Self> {
        Box::new(Error::MissingField { key: key.into() })
    }

    pub fn invalid_field_type(
        key: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Box<Self> {
        Box::new(Error::InvalidFieldType {
            key: key.into(),
            expected,
            found,
        })
    }

    pub fn invalid_field_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::InvalidFieldValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn unknown_type_reference(key: impl Into<String>, reference: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnknownTypeReference {
            key: key.into(),
            reference: reference.into(),
        })
    }

    pub fn invalid_identifier(
        key: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::InvalidIdentifier {
            key: key.into(),
            name: name.into(),
            reason: reason.into(),
        })
    }

    /// Create a parse error pointing at the line and column reported by serde_json.
    pub fn parse(source: serde_json::Error, src: &str, document: &str) -> Box<Self> {
        let span = offset_of(src, source.line(), source.column()).map(|offset| SourceSpan::from(offset..offset));
        Box::new(Error::Parse {
            src: NamedSource::new(document, src.to_string()),
            span,
            document: document.to_string(),
            source,
        })
    }

    /// Key path of the offending field, if the error is about one.
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::Io { .. } | Error::Parse { .. } => None,
            Error::MissingField { key }
            | Error::InvalidFieldType { key, .. }
            | Error::InvalidFieldValue { key, .. }
            | Error::UnknownTypeReference { key, .. }
            | Error::InvalidIdentifier { key, .. }
            | Error::DuplicateConstantValue { key, .. }
            | Error::FlagEnumValueMixing { key, .. } => Some(key),
        }
    }
}

/// Byte offset of a 1-based line and column.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of() {
        let src = "{\n  \"name\": 1,\n}";
        assert_eq!(offset_of(src, 1, 1), Some(0));
        assert_eq!(offset_of(src, 2, 3), Some(4));
        assert_eq!(offset_of(src, 0, 0), None);
    }

    #[test]
    fn test_parse_error_has_span() {
        let src = "{\n  \"name\": \n}";
        let source = serde_json::from_str::<serde_json::Value>(src).unwrap_err();
        let error = Error::parse(source, src, "Broken.json");
        assert!(matches!(*error, Error::Parse { span: Some(_), .. }));
        assert_eq!(error.to_string(), "failed to parse 'Broken.json'");
    }

    #[test]
    fn test_key_accessor() {
        let error = Error::missing_field("properties[0].type");
        assert_eq!(error.key(), Some("properties[0].type"));
    }
}
