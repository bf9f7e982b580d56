//! Enum documents.

use std::collections::HashMap;

use gentool_core::NameRole;
use serde_json::Value;

use crate::{
    EnumKind, Error, Name, Overridable, Result,
    common::{read_aliases, read_header_guard},
    reader::Node,
};

/// A normalized enum document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: Name,
    pub kind: Overridable<EnumKind>,
    pub constants: Vec<Constant>,
    pub aliases: Overridable<Vec<Name>>,
    pub header_guard: Overridable<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: Name,
    pub value: Overridable<i64>,
}

impl EnumDef {
    pub fn is_flag(&self) -> bool {
        self.kind.get() == EnumKind::Flag
    }
}

/// Normalize an enum document.
pub fn normalize_enum(document: &Value) -> Result<EnumDef> {
    let node = Node::root(document)?;
    let name = Name::read(&node, "name", NameRole::Class)?;
    let kind = node.keyword_or("type", || EnumKind::Plain)?;
    let aliases = read_aliases(&node)?;
    let header_guard = read_header_guard(&node, &name)?;
    let constants = read_constants(&node, &name, kind.get())?;

    Ok(EnumDef {
        name,
        kind,
        constants,
        aliases,
        header_guard,
    })
}

fn read_constants(node: &Node<'_>, enum_name: &Name, kind: EnumKind) -> Result<Vec<Constant>> {
    let entries = node.objects("constants")?.unwrap_or_default();

    let mut declared = Vec::with_capacity(entries.len());
    for entry in &entries {
        let name = Name::read(entry, "name", NameRole::EnumConstant)?;
        declared.push((name, entry.int("value")?));
    }

    if kind == EnumKind::Flag {
        let explicit = declared.iter().filter(|(_, value)| value.is_some()).count();
        if explicit != 0 && explicit != declared.len() {
            return Err(Box::new(Error::FlagEnumValueMixing {
                key: node.key_path("constants"),
                name: enum_name.canonical().to_string(),
            }));
        }
    }

    let mut constants: Vec<Constant> = Vec::with_capacity(declared.len());
    let mut seen_values: HashMap<i64, String> = HashMap::new();
    let mut next: i64 = match kind {
        EnumKind::Plain => 0,
        EnumKind::Flag => 1,
    };

    for ((name, declared_value), entry) in declared.into_iter().zip(&entries) {
        if constants.iter().any(|c| c.name.canonical() == name.canonical()) {
            return Err(entry.invalid_value("name", name.canonical(), "constant names must be unique"));
        }

        let value = Overridable::resolve(declared_value, || next);
        let in_domain = match kind {
            EnumKind::Plain => i32::try_from(value.get()).is_ok(),
            EnumKind::Flag => u32::try_from(value.get()).is_ok(),
        };
        if !in_domain {
            let domain = match kind {
                EnumKind::Plain => "plain enum values must fit in int32",
                EnumKind::Flag => "flag enum values must fit in uint32",
            };
            return Err(entry.invalid_value("value", value.get().to_string(), domain));
        }

        if let Some(first) = seen_values.get(&value.get()) {
            return Err(Box::new(Error::DuplicateConstantValue {
                key: entry.key_path("value"),
                value: value.get(),
                first: first.clone(),
                second: name.canonical().to_string(),
            }));
        }
        seen_values.insert(value.get(), name.canonical().to_string());

        next = match kind {
            EnumKind::Plain => value.get() + 1,
            EnumKind::Flag => value.get().saturating_mul(2),
        };
        constants.push(Constant { name, value });
    }

    Ok(constants)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn values(def: &EnumDef) -> Vec<i64> {
        def.constants.iter().map(|c| c.value.get()).collect()
    }

    #[test]
    fn test_plain_auto_increment() {
        let def = normalize_enum(&json!({
            "name": "landmark_type",
            "constants": [{ "name": "unknown" }, { "name": "qr", "value": 10 }, { "name": "aruco" }]
        }))
        .unwrap();

        assert_eq!(def.kind.get(), EnumKind::Plain);
        assert!(def.kind.is_generated());
        assert_eq!(values(&def), [0, 10, 11]);
        assert!(def.constants[1].value.is_explicit());
        assert!(def.constants[2].value.is_generated());
    }

    #[test]
    fn test_plain_negative_values() {
        let def = normalize_enum(&json!({
            "name": "error_code",
            "constants": [{ "name": "failure", "value": -1 }, { "name": "ok" }]
        }))
        .unwrap();
        assert_eq!(values(&def), [-1, 0]);
    }

    #[test]
    fn test_flag_values_must_fit_uint32() {
        let err = normalize_enum(&json!({
            "name": "mask",
            "type": "flag",
            "constants": [{ "name": "negative", "value": -1 }]
        }))
        .unwrap_err();
        assert!(matches!(*err, Error::InvalidFieldValue { ref key, .. } if key == "constants[0].value"));
    }

    #[test]
    fn test_flag_overflow_past_32_constants() {
        let constants: Vec<_> = (0..33).map(|i| json!({ "name": format!("bit{i}") })).collect();
        let err = normalize_enum(&json!({ "name": "wide", "type": "flag", "constants": constants }))
            .unwrap_err();
        assert!(matches!(*err, Error::InvalidFieldValue { ref key, .. } if key == "constants[32].value"));
    }

    #[test]
    fn test_duplicate_constant_names() {
        let err = normalize_enum(&json!({
            "name": "dup",
            "constants": [{ "name": "a" }, { "name": "a" }]
        }))
        .unwrap_err();
        assert!(matches!(*err, Error::InvalidFieldValue { ref key, .. } if key == "constants[1].name"));
    }

    #[test]
    fn test_constant_names_use_enum_constant_role() {
        let def = normalize_enum(&json!({
            "name": "landmark_type",
            "constants": [{ "name": "qr_code" }]
        }))
        .unwrap();
        let constant = &def.constants[0].name;
        assert_eq!(constant.lang(gentool_core::Language::C), "QR_CODE");
        assert_eq!(constant.lang(gentool_core::Language::Cxx), "QrCode");
    }

    #[test]
    fn test_unknown_kind() {
        let err = normalize_enum(&json!({ "name": "e", "type": "bitset" })).unwrap_err();
        assert!(matches!(*err, Error::InvalidFieldValue { ref key, .. } if key == "type"));
    }
}
