//! Non-fatal diagnostics.

use std::fmt;

use serde_json::Value;

use crate::{ClassDef, document::PROVENANCE_SUFFIX};

/// A problem that does not stop generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub key: String,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Keys of `input` that normalization did not consume.
///
/// `normalized` is the fully explicit document written for the entity, so
/// any key it lacks was never read. Provenance markers are skipped.
pub fn unknown_keys(input: &Value, normalized: &Value) -> Vec<Warning> {
    let mut warnings = Vec::new();
    collect_unknown(input, normalized, "", &mut warnings);
    warnings
}

fn collect_unknown(input: &Value, normalized: &Value, path: &str, warnings: &mut Vec<Warning>) {
    match (input, normalized) {
        (Value::Object(input), Value::Object(normalized)) => {
            for (key, value) in input {
                if key.ends_with(PROVENANCE_SUFFIX) {
                    continue;
                }
                let key_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                match normalized.get(key) {
                    Some(known) => collect_unknown(value, known, &key_path, warnings),
                    None => warnings.push(Warning {
                        message: format!("unknown key '{key}' is ignored"),
                        key: key_path,
                    }),
                }
            }
        }
        (Value::Array(input), Value::Array(normalized)) => {
            for (index, (value, known)) in input.iter().zip(normalized).enumerate() {
                collect_unknown(value, known, &format!("{path}[{index}]"), warnings);
            }
        }
        _ => {}
    }
}

/// Hashers that project a property differently from its comparator.
///
/// Such a pair is accepted, but two objects that compare equal may then
/// hash differently.
pub fn coherence_warnings(def: &ClassDef) -> Vec<Warning> {
    let equality = &def.equality_operator;
    let hash = &def.hash_operator;
    if !hash.defined.get() || equality.compare_pointers.get() {
        return Vec::new();
    }

    hash.hashed_properties
        .iter()
        .enumerate()
        .filter_map(|(index, hashed)| {
            let compared = equality.compared(&hashed.name)?;
            let hasher = hashed.normalized_expression();
            let comparator = compared.normalized_expression();
            (hasher != comparator).then(|| Warning {
                key: format!("hashOperator.hashedProperties[{index}].hasher"),
                message: format!(
                    "hasher '{hasher}' differs from comparator '{comparator}' of property '{}'",
                    hashed.name
                ),
            })
        })
        .collect()
}
