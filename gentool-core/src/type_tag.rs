//! The closed set of property type forms.
//!
//! Tags are written in schema documents as `float`, `string_ref`,
//! `ENUM:LandmarkType`, `CLASS_PTR:Vector3`, `ARRAY:string` and so on.
//! Parsing resolves inner references against a [`TypeLookup`] so that a
//! dangling name is rejected before anything is emitted.

use std::{collections::HashMap, fmt, str::FromStr};

use thiserror::Error;

use crate::utils::PLACEHOLDER;

/// Kind of a named entity declared by a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Enum,
    Class,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Enum => f.write_str("an enum"),
            EntityKind::Class => f.write_str("a class"),
        }
    }
}

/// Resolves entity names referenced from type tags.
pub trait TypeLookup {
    fn entity_kind(&self, name: &str) -> Option<EntityKind>;
}

impl TypeLookup for HashMap<String, EntityKind> {
    fn entity_kind(&self, name: &str) -> Option<EntityKind> {
        self.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeTagError {
    #[error("unknown type '{0}'")]
    UnknownForm(String),
    #[error("type '{0}' is missing its inner type")]
    MissingInner(String),
    #[error("unknown type reference '{0}'")]
    UnresolvedReference(String),
    #[error("'{form}' expects {expected} but '{name}' is {found}")]
    WrongKind {
        form: &'static str,
        name: String,
        expected: EntityKind,
        found: EntityKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Double,
    Boolean,
}

impl Scalar {
    pub const ALL: [Scalar; 11] = [
        Scalar::Int8,
        Scalar::Int16,
        Scalar::Int32,
        Scalar::Int64,
        Scalar::UInt8,
        Scalar::UInt16,
        Scalar::UInt32,
        Scalar::UInt64,
        Scalar::Float,
        Scalar::Double,
        Scalar::Boolean,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Scalar::Int8 => "int8",
            Scalar::Int16 => "int16",
            Scalar::Int32 => "int32",
            Scalar::Int64 => "int64",
            Scalar::UInt8 => "uint8",
            Scalar::UInt16 => "uint16",
            Scalar::UInt32 => "uint32",
            Scalar::UInt64 => "uint64",
            Scalar::Float => "float",
            Scalar::Double => "double",
            Scalar::Boolean => "boolean",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Scalar::Float | Scalar::Double | Scalar::Boolean)
    }

    /// Zero value for this scalar.
    pub fn implicit_default(self) -> &'static str {
        match self {
            Scalar::Float => "0.0f",
            Scalar::Double => "0.0",
            Scalar::Boolean => "false",
            _ => "0",
        }
    }
}

/// Element type of a by-value array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Scalar(Scalar),
    String,
    Enum(String),
    Class(String),
}

impl Element {
    pub fn is_primitive(&self) -> bool {
        matches!(self, Element::Scalar(_) | Element::Enum(_))
    }

    fn parse(inner: &str, lookup: &dyn TypeLookup) -> Result<Self, TypeTagError> {
        if let Some(scalar) = Scalar::from_key(inner) {
            return Ok(Element::Scalar(scalar));
        }
        if inner == "string" {
            return Ok(Element::String);
        }
        match lookup.entity_kind(inner) {
            Some(EntityKind::Enum) => Ok(Element::Enum(inner.to_string())),
            Some(EntityKind::Class) => Ok(Element::Class(inner.to_string())),
            None => Err(TypeTagError::UnresolvedReference(inner.to_string())),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Scalar(s) => f.write_str(s.key()),
            Element::String => f.write_str("string"),
            Element::Enum(name) | Element::Class(name) => f.write_str(name),
        }
    }
}

/// How a tag borrows at accessor sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Borrow {
    /// Getter returns a value, setter takes a value.
    Owned,
    /// Getter and setter both use a const reference.
    Ref,
    /// Getter uses a const reference, setter takes a value.
    Mix,
}

/// A property, parameter or return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Scalar(Scalar),
    String,
    StringRef,
    StringMix,
    Enum(String),
    Class(String),
    ClassRef(String),
    ClassMix(String),
    ClassPtr(String),
    ClassPtrRef(String),
    ClassPtrMix(String),
    Array(Element),
    ArrayRef(Element),
    ArrayMix(Element),
    ArrayPtr(String),
    ArrayPtrRef(String),
    ArrayPtrMix(String),
}

impl TypeTag {
    /// Parse a tag, resolving its inner reference.
    pub fn parse(s: &str, lookup: &dyn TypeLookup) -> Result<Self, TypeTagError> {
        let Some((form, inner)) = s.split_once(':') else {
            return match s {
                "string" => Ok(TypeTag::String),
                "string_ref" => Ok(TypeTag::StringRef),
                "string_mix" => Ok(TypeTag::StringMix),
                _ => Scalar::from_key(s)
                    .map(TypeTag::Scalar)
                    .ok_or_else(|| TypeTagError::UnknownForm(s.to_string())),
            };
        };
        if inner.is_empty() {
            return Err(TypeTagError::MissingInner(s.to_string()));
        }

        let class = |form: &'static str| expect_kind(form, inner, EntityKind::Class, lookup);
        let element = || Element::parse(inner, lookup);

        match form {
            "ENUM" => expect_kind("ENUM", inner, EntityKind::Enum, lookup).map(TypeTag::Enum),
            "CLASS" => class("CLASS").map(TypeTag::Class),
            "CLASS_REF" => class("CLASS_REF").map(TypeTag::ClassRef),
            "CLASS_MIX" => class("CLASS_MIX").map(TypeTag::ClassMix),
            "CLASS_PTR" => class("CLASS_PTR").map(TypeTag::ClassPtr),
            "CLASS_PTR_REF" => class("CLASS_PTR_REF").map(TypeTag::ClassPtrRef),
            "CLASS_PTR_MIX" => class("CLASS_PTR_MIX").map(TypeTag::ClassPtrMix),
            "ARRAY" => element().map(TypeTag::Array),
            "ARRAY_REF" => element().map(TypeTag::ArrayRef),
            "ARRAY_MIX" => element().map(TypeTag::ArrayMix),
            "ARRAY_PTR" => class("ARRAY_PTR").map(TypeTag::ArrayPtr),
            "ARRAY_PTR_REF" => class("ARRAY_PTR_REF").map(TypeTag::ArrayPtrRef),
            "ARRAY_PTR_MIX" => class("ARRAY_PTR_MIX").map(TypeTag::ArrayPtrMix),
            _ => Err(TypeTagError::UnknownForm(s.to_string())),
        }
    }

    /// Document spelling of the form, without the inner type.
    pub fn form(&self) -> &'static str {
        match self {
            TypeTag::Scalar(s) => s.key(),
            TypeTag::String => "string",
            TypeTag::StringRef => "string_ref",
            TypeTag::StringMix => "string_mix",
            TypeTag::Enum(_) => "ENUM",
            TypeTag::Class(_) => "CLASS",
            TypeTag::ClassRef(_) => "CLASS_REF",
            TypeTag::ClassMix(_) => "CLASS_MIX",
            TypeTag::ClassPtr(_) => "CLASS_PTR",
            TypeTag::ClassPtrRef(_) => "CLASS_PTR_REF",
            TypeTag::ClassPtrMix(_) => "CLASS_PTR_MIX",
            TypeTag::Array(_) => "ARRAY",
            TypeTag::ArrayRef(_) => "ARRAY_REF",
            TypeTag::ArrayMix(_) => "ARRAY_MIX",
            TypeTag::ArrayPtr(_) => "ARRAY_PTR",
            TypeTag::ArrayPtrRef(_) => "ARRAY_PTR_REF",
            TypeTag::ArrayPtrMix(_) => "ARRAY_PTR_MIX",
        }
    }

    /// Scalars and enums: copy, move, equality and hash are all trivial.
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeTag::Scalar(_) | TypeTag::Enum(_))
    }

    /// The `_REF` and `_MIX` families.
    pub fn is_borrowed(&self) -> bool {
        self.borrow() != Borrow::Owned
    }

    pub fn borrow(&self) -> Borrow {
        match self {
            TypeTag::StringRef
            | TypeTag::ClassRef(_)
            | TypeTag::ClassPtrRef(_)
            | TypeTag::ArrayRef(_)
            | TypeTag::ArrayPtrRef(_) => Borrow::Ref,
            TypeTag::StringMix
            | TypeTag::ClassMix(_)
            | TypeTag::ClassPtrMix(_)
            | TypeTag::ArrayMix(_)
            | TypeTag::ArrayPtrMix(_) => Borrow::Mix,
            TypeTag::Scalar(_)
            | TypeTag::String
            | TypeTag::Enum(_)
            | TypeTag::Class(_)
            | TypeTag::ClassPtr(_)
            | TypeTag::Array(_)
            | TypeTag::ArrayPtr(_) => Borrow::Owned,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TypeTag::String | TypeTag::StringRef | TypeTag::StringMix)
    }

    /// The `CLASS_PTR` family: shared handles that may be null.
    pub fn is_class_ptr(&self) -> bool {
        matches!(
            self,
            TypeTag::ClassPtr(_) | TypeTag::ClassPtrRef(_) | TypeTag::ClassPtrMix(_)
        )
    }

    pub fn is_array_ptr(&self) -> bool {
        matches!(
            self,
            TypeTag::ArrayPtr(_) | TypeTag::ArrayPtrRef(_) | TypeTag::ArrayPtrMix(_)
        )
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            TypeTag::Array(_) | TypeTag::ArrayRef(_) | TypeTag::ArrayMix(_)
        ) || self.is_array_ptr()
    }

    /// Entity referenced by this tag, if any.
    pub fn referenced_name(&self) -> Option<&str> {
        match self {
            TypeTag::Enum(name)
            | TypeTag::Class(name)
            | TypeTag::ClassRef(name)
            | TypeTag::ClassMix(name)
            | TypeTag::ClassPtr(name)
            | TypeTag::ClassPtrRef(name)
            | TypeTag::ClassPtrMix(name)
            | TypeTag::ArrayPtr(name)
            | TypeTag::ArrayPtrRef(name)
            | TypeTag::ArrayPtrMix(name) => Some(name),
            TypeTag::Array(element) | TypeTag::ArrayRef(element) | TypeTag::ArrayMix(element) => {
                match element {
                    Element::Enum(name) | Element::Class(name) => Some(name),
                    Element::Scalar(_) | Element::String => None,
                }
            }
            TypeTag::Scalar(_) | TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => None,
        }
    }

    /// Zero value used when no default is declared. Empty means
    /// default-construct.
    pub fn implicit_default(&self) -> &'static str {
        match self {
            TypeTag::Scalar(scalar) => scalar.implicit_default(),
            _ => "",
        }
    }

    /// Member-wise copy expression over [`PLACEHOLDER`]. Shared handles are
    /// duplicated so that a copy never aliases the original's pointees.
    pub fn copy_expression(&self) -> String {
        if self.is_class_ptr() {
            format!("{p} ? std::make_shared<std::decay_t<decltype(*{p})>>(*{p}) : nullptr", p = PLACEHOLDER)
        } else if self.is_array_ptr() {
            format!(
                "[&] {{ auto copy = {p}; for (auto& element : copy) {{ if (element) {{ element = std::make_shared<std::decay_t<decltype(*element)>>(*element); }} }} return copy; }}()",
                p = PLACEHOLDER
            )
        } else {
            PLACEHOLDER.to_string()
        }
    }

    /// Whether [`copy_expression`](Self::copy_expression) matches what a
    /// compiler-generated copy would do.
    pub fn copy_is_member_wise(&self) -> bool {
        !self.is_class_ptr() && !self.is_array_ptr()
    }

    /// Move expression over [`PLACEHOLDER`].
    pub fn move_expression(&self) -> String {
        if self.is_primitive() {
            PLACEHOLDER.to_string()
        } else {
            format!("std::move({})", PLACEHOLDER)
        }
    }
}

fn expect_kind(
    form: &'static str,
    name: &str,
    expected: EntityKind,
    lookup: &dyn TypeLookup,
) -> Result<String, TypeTagError> {
    match lookup.entity_kind(name) {
        Some(found) if found == expected => Ok(name.to_string()),
        Some(found) => Err(TypeTagError::WrongKind {
            form,
            name: name.to_string(),
            expected,
            found,
        }),
        None => Err(TypeTagError::UnresolvedReference(name.to_string())),
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Array(element) | TypeTag::ArrayRef(element) | TypeTag::ArrayMix(element) => {
                write!(f, "{}:{}", self.form(), element)
            }
            _ => match self.referenced_name() {
                Some(name) => write!(f, "{}:{}", self.form(), name),
                None => f.write_str(self.form()),
            },
        }
    }
}

/// Tags that never reference an entity can be parsed without a lookup.
impl FromStr for TypeTag {
    type Err = TypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        struct Nothing;
        impl TypeLookup for Nothing {
            fn entity_kind(&self, _name: &str) -> Option<EntityKind> {
                None
            }
        }
        Self::parse(s, &Nothing)
    }
}
