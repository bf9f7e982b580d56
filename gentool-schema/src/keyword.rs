//! Enum-constrained field values.

use std::fmt;

/// A closed set of string values a schema field may take.
pub trait Keyword: Copy + Eq + 'static {
    const VARIANTS: &'static [(&'static str, Self)];

    fn keyword(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, variant)| *variant == self)
            .map(|(keyword, _)| *keyword)
            .unwrap_or_default()
    }

    fn from_keyword(s: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(keyword, _)| *keyword == s)
            .map(|(_, variant)| *variant)
    }

    /// Human-readable list of accepted values, for diagnostics.
    fn expected() -> String {
        let keywords: Vec<String> = Self::VARIANTS
            .iter()
            .map(|(keyword, _)| format!("'{keyword}'"))
            .collect();
        format!("expected one of {}", keywords.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Keyword for Visibility {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("public", Visibility::Public),
        ("protected", Visibility::Protected),
        ("private", Visibility::Private),
    ];
}

/// Dispatch mode of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodMode {
    Regular,
    Virtual,
    PureVirtual,
    Override,
}

impl Keyword for MethodMode {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("regular", MethodMode::Regular),
        ("virtual", MethodMode::Virtual),
        ("pureVirtual", MethodMode::PureVirtual),
        ("override", MethodMode::Override),
    ];
}

/// Definition state of a constructor or destructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Definition {
    /// Body generated from the initializer list and code blocks.
    Defined,
    /// `= default`
    Default,
    /// `= delete`
    Deleted,
    /// Not declared at all.
    Omitted,
}

impl Definition {
    /// Whether callers can use the special member.
    pub fn is_available(self) -> bool {
        matches!(self, Definition::Defined | Definition::Default)
    }
}

impl Keyword for Definition {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("defined", Definition::Defined),
        ("default", Definition::Default),
        ("deleted", Definition::Deleted),
        ("omitted", Definition::Omitted),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    /// Sequential `int32` values.
    Plain,
    /// `uint32` bitmask values.
    Flag,
}

impl Keyword for EnumKind {
    const VARIANTS: &'static [(&'static str, Self)] =
        &[("plain", EnumKind::Plain), ("flag", EnumKind::Flag)];
}

macro_rules! display_keyword {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.keyword())
            }
        })*
    };
}

display_keyword!(Visibility, MethodMode, Definition, EnumKind);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        assert_eq!(MethodMode::from_keyword("pureVirtual"), Some(MethodMode::PureVirtual));
        assert_eq!(MethodMode::PureVirtual.keyword(), "pureVirtual");
        assert_eq!(Definition::from_keyword("gone"), None);
        assert_eq!(Visibility::Protected.to_string(), "protected");
    }

    #[test]
    fn test_expected_lists_every_keyword() {
        assert_eq!(
            Visibility::expected(),
            "expected one of 'public', 'protected', 'private'"
        );
    }
}
