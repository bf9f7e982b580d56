//! Case styles for canonical identifiers.
//!
//! A canonical name is a list of `_`-separated segments. Every segment is
//! non-empty, alphanumeric and starts with a letter, which is what makes the
//! camel styles reversible.

use std::fmt;

use thiserror::Error;

/// Separator between the segments of a canonical name.
pub const SEGMENT_DELIMITER: char = '_';

/// Errors raised while styling or validating an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("name is empty")]
    Empty,
    #[error("segment {index} is empty")]
    EmptySegment { index: usize },
    #[error("segment '{segment}' starts with a digit")]
    DigitLeadingSegment { segment: String },
    #[error("segment '{segment}' contains the non-alphanumeric character '{character}'")]
    NonAlphanumeric { segment: String, character: char },
    #[error("'{name}' is not a legal identifier")]
    IllegalIdentifier { name: String },
}

/// The seven case styles a canonical name can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NameStyle {
    /// `lower_case`
    LowerCase,
    /// `UPPER_CASE`
    UpperCase,
    /// `camelBack`
    CamelBack,
    /// `CamelCase`
    CamelCase,
    /// `camel_Snake_Back`
    CamelSnakeBack,
    /// `Camel_Snake_Case`
    CamelSnakeCase,
    /// `Leading_upper_snake_case`
    LeadingUpperSnakeCase,
}

impl NameStyle {
    pub const ALL: [NameStyle; 7] = [
        NameStyle::LowerCase,
        NameStyle::UpperCase,
        NameStyle::CamelBack,
        NameStyle::CamelCase,
        NameStyle::CamelSnakeBack,
        NameStyle::CamelSnakeCase,
        NameStyle::LeadingUpperSnakeCase,
    ];

    /// Key used for this style in schema documents (`name.style.<key>`).
    pub fn key(self) -> &'static str {
        match self {
            NameStyle::LowerCase => "lowerCase",
            NameStyle::UpperCase => "upperCase",
            NameStyle::CamelBack => "camelBack",
            NameStyle::CamelCase => "camelCase",
            NameStyle::CamelSnakeBack => "camelSnakeBack",
            NameStyle::CamelSnakeCase => "camelSnakeCase",
            NameStyle::LeadingUpperSnakeCase => "leadingUpperSnakeCase",
        }
    }

    fn is_snake(self) -> bool {
        !matches!(self, NameStyle::CamelBack | NameStyle::CamelCase)
    }
}

impl fmt::Display for NameStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Split and validate a canonical name into its segments.
pub fn split_canonical(name: &str) -> Result<Vec<&str>, NamingError> {
    if name.is_empty() {
        return Err(NamingError::Empty);
    }
    let segments: Vec<&str> = name.split(SEGMENT_DELIMITER).collect();
    for (index, segment) in segments.iter().enumerate() {
        let mut chars = segment.chars();
        match chars.next() {
            None => return Err(NamingError::EmptySegment { index }),
            Some(c) if c.is_ascii_digit() => {
                return Err(NamingError::DigitLeadingSegment {
                    segment: segment.to_string(),
                });
            }
            Some(_) => {}
        }
        if let Some(character) = segment.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(NamingError::NonAlphanumeric {
                segment: segment.to_string(),
                character,
            });
        }
    }
    Ok(segments)
}

/// Render a canonical name in the given style.
///
/// ```
/// use gentool_core::{NameStyle, styled_name};
///
/// assert_eq!(styled_name("landmark_type", NameStyle::CamelCase).unwrap(), "LandmarkType");
/// assert_eq!(styled_name("landmark_type", NameStyle::CamelBack).unwrap(), "landmarkType");
/// ```
pub fn styled_name(name: &str, style: NameStyle) -> Result<String, NamingError> {
    let segments = split_canonical(name)?;
    Ok(join_segments(&segments, style))
}

fn join_segments(segments: &[&str], style: NameStyle) -> String {
    let lower = |s: &str| s.to_ascii_lowercase();
    let upper = |s: &str| s.to_ascii_uppercase();
    let capitalized = |s: &str| capitalize(&s.to_ascii_lowercase());

    let parts: Vec<String> = segments
        .iter()
        .enumerate()
        .map(|(i, s)| match style {
            NameStyle::LowerCase | NameStyle::LeadingUpperSnakeCase => lower(s),
            NameStyle::UpperCase => upper(s),
            NameStyle::CamelBack | NameStyle::CamelSnakeBack if i == 0 => lower(s),
            NameStyle::CamelBack
            | NameStyle::CamelSnakeBack
            | NameStyle::CamelCase
            | NameStyle::CamelSnakeCase => capitalized(s),
        })
        .collect();

    let separator = if style.is_snake() { "_" } else { "" };
    let joined = parts.join(separator);
    if style == NameStyle::LeadingUpperSnakeCase {
        capitalize(&joined)
    } else {
        joined
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_ascii_uppercase().to_string() + chars.as_str(),
    }
}

/// Re-segment a styled name produced by [`styled_name`] into lower-case segments.
pub fn segments(styled: &str, style: NameStyle) -> Vec<String> {
    if style.is_snake() {
        return styled
            .split(SEGMENT_DELIMITER)
            .map(|s| s.to_ascii_lowercase())
            .collect();
    }

    let mut result: Vec<String> = Vec::new();
    for c in styled.chars() {
        if c.is_ascii_uppercase() || result.is_empty() {
            result.push(String::new());
        }
        if let Some(last) = result.last_mut() {
            last.push(c.to_ascii_lowercase());
        }
    }
    result
}

/// Check that an override value is a legal identifier: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn validate_identifier(name: &str) -> Result<(), NamingError> {
    let mut chars = name.chars();
    let legal_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if legal_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(NamingError::IllegalIdentifier {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_styles() {
        let name = "position_in_world";
        let expected = [
            (NameStyle::LowerCase, "position_in_world"),
            (NameStyle::UpperCase, "POSITION_IN_WORLD"),
            (NameStyle::CamelBack, "positionInWorld"),
            (NameStyle::CamelCase, "PositionInWorld"),
            (NameStyle::CamelSnakeBack, "position_In_World"),
            (NameStyle::CamelSnakeCase, "Position_In_World"),
            (NameStyle::LeadingUpperSnakeCase, "Position_in_world"),
        ];
        for (style, styled) in expected {
            assert_eq!(styled_name(name, style).unwrap(), styled, "{style}");
        }
    }

    #[test]
    fn test_mixed_case_segments_are_normalized() {
        assert_eq!(styled_name("Vector3f", NameStyle::LowerCase).unwrap(), "vector3f");
        assert_eq!(styled_name("Vector3f", NameStyle::CamelCase).unwrap(), "Vector3f");
        assert_eq!(styled_name("QR_code", NameStyle::CamelBack).unwrap(), "qrCode");
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(styled_name("", NameStyle::LowerCase), Err(NamingError::Empty));
        assert_eq!(
            styled_name("a__b", NameStyle::LowerCase),
            Err(NamingError::EmptySegment { index: 1 })
        );
        assert!(matches!(
            styled_name("a_2b", NameStyle::LowerCase),
            Err(NamingError::DigitLeadingSegment { .. })
        ));
        assert!(matches!(
            styled_name("a-b", NameStyle::LowerCase),
            Err(NamingError::NonAlphanumeric { character: '-', .. })
        ));
        assert!(matches!(
            styled_name("trailing_", NameStyle::LowerCase),
            Err(NamingError::EmptySegment { index: 1 })
        ));
    }

    #[test]
    fn test_round_trip_through_every_style() {
        for name in ["x", "point", "landmark_type", "vector3_f", "a_b_c_d", "ICP_result"] {
            let expected: Vec<String> = name.split('_').map(|s| s.to_ascii_lowercase()).collect();
            for style in NameStyle::ALL {
                let styled = styled_name(name, style).unwrap();
                let recovered = segments(&styled, style);
                assert_eq!(recovered, expected, "{name} as {style} -> {styled}");
                assert_eq!(
                    styled_name(&recovered.join("_"), NameStyle::LowerCase).unwrap(),
                    name.to_ascii_lowercase()
                );
            }
        }
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("m_value").is_ok());
        assert!(validate_identifier("_private").is_ok());
        assert!(validate_identifier("PSMVector3").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("3d").is_err());
        assert!(validate_identifier("with space").is_err());
    }
}
