//! Typed access to schema document fields.

use std::sync::LazyLock;

use serde_json::{Map, Value};

use crate::{Error, Overridable, Result, keyword::Keyword};

static EMPTY: LazyLock<Map<String, Value>> = LazyLock::new(Map::new);

/// A JSON object inside a schema document, together with its key path.
///
/// Every accessor enforces the field's type and reports failures with the
/// full path of the offending key, e.g. `properties[2].getterMode`.
///
/// # Example
///
/// ```ignore
/// let node = Node::root(&document)?;
/// let name = node.required_str("name")?;
/// for property in node.objects("properties")?.unwrap_or_default() {
///     let tag = property.required_str("type")?;
/// }
/// ```
#[derive(Debug, Clone)]
pub(crate) struct Node<'a> {
    map: &'a Map<String, Value>,
    path: String,
}

impl<'a> Node<'a> {
    pub fn root(value: &'a Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self {
                map,
                path: String::new(),
            }),
            other => Err(Error::invalid_field_type("<document>", "an object", type_name(other))),
        }
    }

    /// Full path of a key under this node.
    pub fn key_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    pub fn str(&self, key: &str) -> Result<Option<&'a str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.type_error(key, "a string", other)),
        }
    }

    pub fn required_str(&self, key: &str) -> Result<&'a str> {
        self.str(key)?
            .ok_or_else(|| Error::missing_field(self.key_path(key)))
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.type_error(key, "a boolean", other)),
        }
    }

    pub fn int(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                None => Err(Error::invalid_field_value(
                    self.key_path(key),
                    n.to_string(),
                    "expected an integer that fits in 64 bits",
                )),
            },
            Some(other) => Err(self.type_error(key, "an integer", other)),
        }
    }

    /// An array of strings.
    pub fn strings(&self, key: &str) -> Result<Option<Vec<String>>> {
        let Some(items) = self.array(key)? else {
            return Ok(None);
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(Error::invalid_field_type(
                    format!("{}[{}]", self.key_path(key), index),
                    "a string",
                    type_name(other),
                )),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn array(&self, key: &str) -> Result<Option<&'a Vec<Value>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(self.type_error(key, "an array", other)),
        }
    }

    pub fn object(&self, key: &str) -> Result<Option<Node<'a>>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Node {
                map,
                path: self.key_path(key),
            })),
            Some(other) => Err(self.type_error(key, "an object", other)),
        }
    }

    /// A nested object, or an empty one when the key is absent so that
    /// every field of it resolves to its default.
    pub fn object_or_empty(&self, key: &str) -> Result<Node<'a>> {
        Ok(self.object(key)?.unwrap_or_else(|| Node {
            map: &EMPTY,
            path: self.key_path(key),
        }))
    }

    /// An array of objects; element paths read `key[index]`.
    pub fn objects(&self, key: &str) -> Result<Option<Vec<Node<'a>>>> {
        let Some(items) = self.array(key)? else {
            return Ok(None);
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| Node::element(item, format!("{}[{}]", self.key_path(key), index)))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Wrap an array element that must be an object.
    pub fn element(value: &'a Value, path: String) -> Result<Node<'a>> {
        match value {
            Value::Object(map) => Ok(Node { map, path }),
            other => Err(Error::invalid_field_type(path, "an object", type_name(other))),
        }
    }

    pub fn keyword<K: Keyword>(&self, key: &str) -> Result<Option<K>> {
        match self.str(key)? {
            None => Ok(None),
            Some(s) => K::from_keyword(s)
                .map(Some)
                .ok_or_else(|| Error::invalid_field_value(self.key_path(key), s, K::expected())),
        }
    }

    pub fn flag_or(&self, key: &str, default: impl FnOnce() -> bool) -> Result<Overridable<bool>> {
        Ok(Overridable::resolve(self.bool(key)?, default))
    }

    pub fn keyword_or<K: Keyword>(&self, key: &str, default: impl FnOnce() -> K) -> Result<Overridable<K>> {
        Ok(Overridable::resolve(self.keyword(key)?, default))
    }

    pub fn string_or(
        &self,
        key: &str,
        default: impl FnOnce() -> String,
    ) -> Result<Overridable<String>> {
        Ok(Overridable::resolve(self.str(key)?.map(str::to_string), default))
    }

    /// Free-form code lines; absent means no code.
    pub fn lines_or(
        &self,
        key: &str,
        default: impl FnOnce() -> Vec<String>,
    ) -> Result<Overridable<Vec<String>>> {
        Ok(Overridable::resolve(self.strings(key)?, default))
    }

    /// Error for a key whose value violates a semantic rule.
    pub fn invalid_value(
        &self,
        key: &str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Error> {
        Error::invalid_field_value(self.key_path(key), value, reason)
    }

    fn type_error(&self, key: &str, expected: &'static str, found: &Value) -> Box<Error> {
        Error::invalid_field_type(self.key_path(key), expected, type_name(found))
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_nested_key_paths() {
        let doc = json!({ "properties": [{ "name": "x" }, { "name": 3 }] });
        let root = Node::root(&doc).unwrap();
        let properties = root.objects("properties").unwrap().unwrap();
        assert_eq!(properties[1].key_path("name"), "properties[1].name");
        assert_eq!(properties[0].required_str("name").unwrap(), "x");

        let err = properties[1].required_str("name").unwrap_err();
        assert!(matches!(
            *err,
            Error::InvalidFieldType { ref key, expected: "a string", found: "a number" } if key == "properties[1].name"
        ));
    }

    #[test]
    fn test_missing_required_field() {
        let doc = json!({});
        let root = Node::root(&doc).unwrap();
        let err = root.required_str("name").unwrap_err();
        assert!(matches!(*err, Error::MissingField { ref key } if key == "name"));
    }

    #[test]
    fn test_root_must_be_object() {
        let doc = json!([1, 2]);
        assert!(Node::root(&doc).is_err());
    }

    #[test]
    fn test_keyword_validation() {
        let doc = json!({ "copyConstructor": { "visibility": "friend" } });
        let root = Node::root(&doc).unwrap();
        let ctor = root.object("copyConstructor").unwrap().unwrap();
        let err = ctor.keyword::<crate::Visibility>("visibility").unwrap_err();
        assert!(matches!(
            *err,
            Error::InvalidFieldValue { ref key, ref value, .. }
                if key == "copyConstructor.visibility" && value == "friend"
        ));
    }

    #[test]
    fn test_defaults_record_provenance() {
        let doc = json!({ "static": true, "codeFront": ["a();"] });
        let root = Node::root(&doc).unwrap();
        assert!(root.flag_or("static", || false).unwrap().is_explicit());
        assert!(root.flag_or("final", || false).unwrap().is_generated());
        assert_eq!(root.lines_or("codeFront", Vec::new).unwrap().len(), 1);
        assert!(root.lines_or("codeBack", Vec::new).unwrap().is_empty());
    }

    #[test]
    fn test_strings_reject_non_strings() {
        let doc = json!({ "code": ["ok", 1] });
        let root = Node::root(&doc).unwrap();
        let err = root.strings("code").unwrap_err();
        assert_eq!(err.key(), Some("code[1]"));
    }

    #[test]
    fn test_int_accepts_negative() {
        let doc = json!({ "value": -3 });
        let root = Node::root(&doc).unwrap();
        assert_eq!(root.int("value").unwrap(), Some(-3));
    }
}
