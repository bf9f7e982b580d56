//! Fields shared by enum and interface documents.

use gentool_core::{NameRole, NameStyle};
use serde_json::Value;

use crate::{Error, Name, Overridable, Result, reader::Node};

/// Resolve the `aliases` list. Entries are either a plain canonical name
/// or an object with a `name` key and optional overrides.
pub(crate) fn read_aliases(node: &Node<'_>) -> Result<Overridable<Vec<Name>>> {
    let Some(items) = node.array("aliases")? else {
        return Ok(Overridable::generated(Vec::new()));
    };
    let aliases = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = format!("{}[{}]", node.key_path("aliases"), index);
            match item {
                Value::String(canonical) => Name::declared(canonical, NameRole::Class)
                    .map_err(|e| Error::invalid_identifier(path, canonical.as_str(), e.to_string())),
                _ => {
                    let alias = Node::element(item, path)?;
                    Name::read(&alias, "name", NameRole::Class)
                }
            }
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Overridable::explicit(aliases))
}

/// Resolve `headerGuardName`, defaulting to the UPPER_CASE name.
pub(crate) fn read_header_guard(node: &Node<'_>, name: &Name) -> Result<Overridable<String>> {
    let guard = node.string_or("headerGuardName", || name.style(NameStyle::UpperCase).to_string())?;
    if !guard.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(node.invalid_value(
            "headerGuardName",
            guard.value().as_str(),
            "header guard names may only contain letters, digits and '_'",
        ));
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_aliases_accept_strings_and_objects() {
        let doc = json!({ "aliases": ["vector3", { "name": "vec3", "name.lang.c": "psm_v3_t" }] });
        let node = Node::root(&doc).unwrap();
        let aliases = read_aliases(&node).unwrap();
        assert!(aliases.is_explicit());
        assert_eq!(aliases[0].lang(gentool_core::Language::C), "psm_vector3_t");
        assert!(aliases[0].canonical_field().is_explicit());
        assert!(aliases[1].canonical_field().is_explicit());
        assert_eq!(aliases[1].lang(gentool_core::Language::C), "psm_v3_t");
    }

    #[test]
    fn test_header_guard_default_and_validation() {
        let doc = json!({ "name": "pose_estimation" });
        let node = Node::root(&doc).unwrap();
        let name = Name::read(&node, "name", NameRole::Class).unwrap();
        assert_eq!(read_header_guard(&node, &name).unwrap().value(), "POSE_ESTIMATION");

        let doc = json!({ "name": "pose", "headerGuardName": "POSE-H" });
        let node = Node::root(&doc).unwrap();
        let name = Name::read(&node, "name", NameRole::Class).unwrap();
        assert!(read_header_guard(&node, &name).is_err());
    }
}
