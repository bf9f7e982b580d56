use gentool_core::{Language, NameRole, NameStyle, NamingError, styled_name, validate_identifier, wrap};
use indexmap::IndexMap;

use crate::{Error, Overridable, Result, reader::Node};

/// A canonical name together with every style and language projection.
///
/// Styles and language names default to the naming engine's output and
/// may be overridden with `<key>.style.<style>` and `<key>.lang.<language>`
/// keys next to the name key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    canonical: Overridable<String>,
    styles: IndexMap<NameStyle, Overridable<String>>,
    languages: IndexMap<Language, Overridable<String>>,
}

impl Name {
    /// Resolve a name from a required key.
    pub(crate) fn read(node: &Node<'_>, key: &str, role: NameRole) -> Result<Self> {
        let canonical = node.required_str(key)?.to_string();
        Self::resolve(node, key, Overridable::explicit(canonical), role)
    }

    /// Resolve a name from an optional key, falling back to `default`.
    pub(crate) fn read_or(node: &Node<'_>, key: &str, default: &str, role: NameRole) -> Result<Self> {
        let canonical = node.string_or(key, || default.to_string())?;
        Self::resolve(node, key, canonical, role)
    }

    /// A name written out by the author without overrides.
    pub(crate) fn declared(canonical: &str, role: NameRole) -> std::result::Result<Self, NamingError> {
        let mut name = Self::generated(canonical, role)?;
        name.canonical = Overridable::explicit(canonical.to_string());
        Ok(name)
    }

    /// Resolve a name that has no document key of its own.
    pub(crate) fn generated(canonical: &str, role: NameRole) -> std::result::Result<Self, NamingError> {
        let styles: IndexMap<_, _> = NameStyle::ALL
            .into_iter()
            .map(|style| Ok((style, Overridable::generated(styled_name(canonical, style)?))))
            .collect::<std::result::Result<_, NamingError>>()?;
        let languages: IndexMap<_, _> = Language::ALL
            .into_iter()
            .map(|language| {
                let styled = styled_name(canonical, role.default_style(language))?;
                Ok((language, Overridable::generated(wrap(role.template(language), &styled))))
            })
            .collect::<std::result::Result<_, NamingError>>()?;
        Ok(Self {
            canonical: Overridable::generated(canonical.to_string()),
            styles,
            languages,
        })
    }

    fn resolve(node: &Node<'_>, key: &str, canonical: Overridable<String>, role: NameRole) -> Result<Self> {
        let mut name = Self::generated(canonical.value(), role).map_err(|e| {
            Error::invalid_identifier(node.key_path(key), canonical.value().as_str(), e.to_string())
        })?;
        name.canonical = canonical;

        for style in NameStyle::ALL {
            let override_key = format!("{key}.style.{}", style.key());
            if let Some(value) = read_override(node, &override_key)? {
                name.styles.insert(style, Overridable::explicit(value));
            }
        }
        for language in Language::ALL {
            let override_key = format!("{key}.lang.{}", language.key());
            if let Some(value) = read_override(node, &override_key)? {
                name.languages.insert(language, Overridable::explicit(value));
            }
        }
        Ok(name)
    }

    pub fn canonical(&self) -> &str {
        self.canonical.value()
    }

    pub fn canonical_field(&self) -> &Overridable<String> {
        &self.canonical
    }

    /// The name in the given style.
    pub fn style(&self, style: NameStyle) -> &str {
        self.styles.get(&style).map_or("", |s| s.value().as_str())
    }

    /// The name projected for the given language.
    pub fn lang(&self, language: Language) -> &str {
        self.languages.get(&language).map_or("", |s| s.value().as_str())
    }

    pub fn styles(&self) -> impl Iterator<Item = (NameStyle, &Overridable<String>)> {
        self.styles.iter().map(|(style, value)| (*style, value))
    }

    pub fn languages(&self) -> impl Iterator<Item = (Language, &Overridable<String>)> {
        self.languages.iter().map(|(language, value)| (*language, value))
    }
}

fn read_override(node: &Node<'_>, key: &str) -> Result<Option<String>> {
    let Some(value) = node.str(key)? else {
        return Ok(None);
    };
    validate_identifier(value)
        .map_err(|e| Error::invalid_identifier(node.key_path(key), value, e.to_string()))?;
    Ok(Some(value.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_generated_projections() {
        let doc = json!({ "name": "landmark_observation" });
        let node = Node::root(&doc).unwrap();
        let name = Name::read(&node, "name", NameRole::Class).unwrap();

        assert!(name.canonical_field().is_explicit());
        assert_eq!(name.style(NameStyle::UpperCase), "LANDMARK_OBSERVATION");
        assert_eq!(name.lang(Language::C), "psm_landmark_observation_t");
        assert_eq!(name.lang(Language::ObjectiveC), "PSMLandmarkObservation");
    }

    #[test]
    fn test_overrides_are_not_restyled() {
        let doc = json!({
            "name": "qr_detection",
            "name.style.camelCase": "QRDetection",
            "name.lang.cPlusPlus": "QRDetection"
        });
        let node = Node::root(&doc).unwrap();
        let name = Name::read(&node, "name", NameRole::Class).unwrap();

        assert_eq!(name.style(NameStyle::CamelCase), "QRDetection");
        assert_eq!(name.lang(Language::Cxx), "QRDetection");
        assert_eq!(name.lang(Language::Swift), "QrDetection");
        assert!(name.languages().any(|(l, v)| l == Language::Cxx && v.is_explicit()));
    }

    #[test]
    fn test_invalid_canonical_name() {
        let doc = json!({ "name": "bad-name" });
        let node = Node::root(&doc).unwrap();
        let err = Name::read(&node, "name", NameRole::Class).unwrap_err();
        assert!(matches!(*err, Error::InvalidIdentifier { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_invalid_override() {
        let doc = json!({ "name": "point", "name.lang.c": "1point" });
        let node = Node::root(&doc).unwrap();
        let err = Name::read(&node, "name", NameRole::Class).unwrap_err();
        assert!(matches!(*err, Error::InvalidIdentifier { ref key, .. } if key == "name.lang.c"));
    }

    #[test]
    fn test_read_or_falls_back() {
        let doc = json!({ "getterName.lang.c": "read_label" });
        let node = Node::root(&doc).unwrap();
        let name = Name::read_or(&node, "getterName", "label", NameRole::Getter).unwrap();
        assert!(name.canonical_field().is_generated());
        assert_eq!(name.lang(Language::Cxx), "getLabel");
        assert_eq!(name.lang(Language::C), "read_label");
    }
}
