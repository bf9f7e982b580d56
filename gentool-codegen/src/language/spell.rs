//! Type spelling per target language.

use gentool_core::{Borrow, Element, Language, Scalar, TypeTag};
use gentool_schema::{Name, Registry};
use thiserror::Error;

/// Where a spelled type appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseSite {
    /// Member variables, locals and template arguments.
    Any,
    /// Getter return type.
    Getter,
    /// Setter parameter type.
    Setter,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpellError {
    #[error("type tag '{tag}' references '{name}', which is not in the registry")]
    UnknownTypeTag { tag: String, name: String },
}

/// Namespace every C++ entity is declared in.
pub const CXX_NAMESPACE: &str = "psm";

/// C name of a class without its `_t` suffix, e.g. `psm_vector3`.
///
/// Function names, the handle type and enum types are derived from it.
pub fn c_stem(name: &Name) -> &str {
    let c = name.lang(Language::C);
    c.strip_suffix("_t").unwrap_or(c)
}

/// `psm_vector3_ref_t`
pub fn c_ref_type(name: &Name) -> String {
    format!("{}_ref_t", c_stem(name))
}

/// `psm_landmark_type_e`
pub fn c_enum_type(name: &Name) -> String {
    format!("{}_e", c_stem(name))
}

/// Spells [`TypeTag`]s for one registry.
///
/// C++ names are unqualified by default, as seen from inside the `psm`
/// namespace; [`qualified`](Self::qualified) prefixes them.
#[derive(Debug, Clone, Copy)]
pub struct TypeSpeller<'a> {
    registry: &'a Registry,
    qualified: bool,
}

impl<'a> TypeSpeller<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            qualified: false,
        }
    }

    pub fn qualified(mut self, qualified: bool) -> Self {
        self.qualified = qualified;
        self
    }

    pub fn spell(&self, tag: &TypeTag, language: Language, site: UseSite) -> Result<String, SpellError> {
        match language {
            Language::Cxx => self.cxx(tag, site),
            Language::C => self.c(tag, site),
            Language::ObjectiveC => self.objc(tag),
            Language::Swift => self.swift(tag),
            Language::JavaScript => self.javascript(tag),
        }
    }

    /// The registry entry a tag refers to.
    pub fn entity(&self, tag: &TypeTag, name: &str) -> Result<&'a Name, SpellError> {
        self.registry
            .get(name)
            .map(|entity| entity.name())
            .ok_or_else(|| SpellError::UnknownTypeTag {
                tag: tag.to_string(),
                name: name.to_string(),
            })
    }

    fn cxx_name(&self, tag: &TypeTag, name: &str) -> Result<String, SpellError> {
        let cxx = self.entity(tag, name)?.lang(Language::Cxx);
        Ok(if self.qualified {
            format!("{CXX_NAMESPACE}::{cxx}")
        } else {
            cxx.to_string()
        })
    }

    fn cxx_element(&self, tag: &TypeTag, element: &Element) -> Result<String, SpellError> {
        match element {
            Element::Scalar(scalar) => Ok(cxx_scalar(*scalar).to_string()),
            Element::String => Ok("std::string".to_string()),
            Element::Enum(name) | Element::Class(name) => self.cxx_name(tag, name),
        }
    }

    fn cxx(&self, tag: &TypeTag, site: UseSite) -> Result<String, SpellError> {
        let base = match tag {
            TypeTag::Scalar(scalar) => return Ok(cxx_scalar(*scalar).to_string()),
            TypeTag::Enum(name) => return self.cxx_name(tag, name),
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => "std::string".to_string(),
            TypeTag::Class(name) | TypeTag::ClassRef(name) | TypeTag::ClassMix(name) => {
                self.cxx_name(tag, name)?
            }
            TypeTag::ClassPtr(name) | TypeTag::ClassPtrRef(name) | TypeTag::ClassPtrMix(name) => {
                format!("std::shared_ptr<{}>", self.cxx_name(tag, name)?)
            }
            TypeTag::Array(element) | TypeTag::ArrayRef(element) | TypeTag::ArrayMix(element) => {
                format!("std::vector<{}>", self.cxx_element(tag, element)?)
            }
            TypeTag::ArrayPtr(name) | TypeTag::ArrayPtrRef(name) | TypeTag::ArrayPtrMix(name) => {
                format!("std::vector<std::shared_ptr<{}>>", self.cxx_name(tag, name)?)
            }
        };

        let by_reference = match (site, tag.borrow()) {
            (UseSite::Any, _) | (_, Borrow::Owned) => false,
            (UseSite::Getter, Borrow::Ref | Borrow::Mix) => true,
            (UseSite::Setter, Borrow::Ref) => true,
            (UseSite::Setter, Borrow::Mix) => false,
        };
        Ok(if by_reference { format!("const {base}&") } else { base })
    }

    fn c_element(&self, tag: &TypeTag, element: &Element, site: UseSite) -> Result<String, SpellError> {
        let setter = site == UseSite::Setter;
        Ok(match element {
            Element::Scalar(scalar) => format!("const {}*", c_scalar(*scalar)),
            Element::Enum(name) => format!("const {}*", c_enum_type(self.entity(tag, name)?)),
            Element::String if setter => "const char* const*".to_string(),
            Element::String => "const char**".to_string(),
            Element::Class(name) => {
                let class = self.entity(tag, name)?.lang(Language::C);
                if setter {
                    format!("const {class}* const*")
                } else {
                    format!("{class}**")
                }
            }
        })
    }

    fn c(&self, tag: &TypeTag, site: UseSite) -> Result<String, SpellError> {
        Ok(match tag {
            TypeTag::Scalar(scalar) => c_scalar(*scalar).to_string(),
            TypeTag::Enum(name) => c_enum_type(self.entity(tag, name)?),
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => "const char*".to_string(),
            TypeTag::Class(name) | TypeTag::ClassRef(name) | TypeTag::ClassMix(name) => {
                let class = self.entity(tag, name)?.lang(Language::C);
                match site {
                    UseSite::Any => class.to_string(),
                    UseSite::Getter => format!("{class}*"),
                    UseSite::Setter => format!("const {class}*"),
                }
            }
            TypeTag::ClassPtr(name) | TypeTag::ClassPtrRef(name) | TypeTag::ClassPtrMix(name) => {
                let handle = c_ref_type(self.entity(tag, name)?);
                match site {
                    UseSite::Any => handle,
                    UseSite::Getter => format!("{handle}*"),
                    UseSite::Setter => format!("const {handle}*"),
                }
            }
            TypeTag::Array(element) | TypeTag::ArrayRef(element) | TypeTag::ArrayMix(element) => {
                self.c_element(tag, element, site)?
            }
            TypeTag::ArrayPtr(name) | TypeTag::ArrayPtrRef(name) | TypeTag::ArrayPtrMix(name) => {
                let handle = c_ref_type(self.entity(tag, name)?);
                if site == UseSite::Setter {
                    format!("const {handle}* const*")
                } else {
                    format!("{handle}**")
                }
            }
        })
    }

    fn objc(&self, tag: &TypeTag) -> Result<String, SpellError> {
        let class = |name: &str| -> Result<String, SpellError> {
            Ok(format!("{}*", self.entity(tag, name)?.lang(Language::ObjectiveC)))
        };
        let element = |element: &Element| -> Result<String, SpellError> {
            match element {
                Element::Scalar(_) | Element::Enum(_) => Ok("NSNumber*".to_string()),
                Element::String => Ok("NSString*".to_string()),
                Element::Class(name) => class(name),
            }
        };
        Ok(match tag {
            TypeTag::Scalar(Scalar::Boolean) => "BOOL".to_string(),
            TypeTag::Scalar(scalar) => c_scalar(*scalar).to_string(),
            TypeTag::Enum(name) => self.entity(tag, name)?.lang(Language::ObjectiveC).to_string(),
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => "NSString*".to_string(),
            TypeTag::Class(name)
            | TypeTag::ClassRef(name)
            | TypeTag::ClassMix(name)
            | TypeTag::ClassPtr(name)
            | TypeTag::ClassPtrRef(name)
            | TypeTag::ClassPtrMix(name) => class(name)?,
            TypeTag::Array(e) | TypeTag::ArrayRef(e) | TypeTag::ArrayMix(e) => {
                format!("NSArray<{}>*", element(e)?)
            }
            TypeTag::ArrayPtr(name) | TypeTag::ArrayPtrRef(name) | TypeTag::ArrayPtrMix(name) => {
                format!("NSArray<{}>*", class(name)?)
            }
        })
    }

    fn swift(&self, tag: &TypeTag) -> Result<String, SpellError> {
        let named = |name: &str| -> Result<String, SpellError> {
            Ok(self.entity(tag, name)?.lang(Language::Swift).to_string())
        };
        let element = |element: &Element| -> Result<String, SpellError> {
            match element {
                Element::Scalar(scalar) => Ok(swift_scalar(*scalar).to_string()),
                Element::String => Ok("String".to_string()),
                Element::Enum(name) | Element::Class(name) => named(name),
            }
        };
        Ok(match tag {
            TypeTag::Scalar(scalar) => swift_scalar(*scalar).to_string(),
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => "String".to_string(),
            TypeTag::Enum(name) | TypeTag::Class(name) | TypeTag::ClassRef(name) | TypeTag::ClassMix(name) => {
                named(name)?
            }
            TypeTag::ClassPtr(name) | TypeTag::ClassPtrRef(name) | TypeTag::ClassPtrMix(name) => {
                format!("{}?", named(name)?)
            }
            TypeTag::Array(e) | TypeTag::ArrayRef(e) | TypeTag::ArrayMix(e) => format!("[{}]", element(e)?),
            TypeTag::ArrayPtr(name) | TypeTag::ArrayPtrRef(name) | TypeTag::ArrayPtrMix(name) => {
                format!("[{}]", named(name)?)
            }
        })
    }

    fn javascript(&self, tag: &TypeTag) -> Result<String, SpellError> {
        let named = |name: &str| -> Result<String, SpellError> {
            Ok(self.entity(tag, name)?.lang(Language::JavaScript).to_string())
        };
        let element = |element: &Element| -> Result<String, SpellError> {
            match element {
                Element::Scalar(scalar) => Ok(javascript_scalar(*scalar).to_string()),
                Element::String => Ok("string".to_string()),
                Element::Enum(name) | Element::Class(name) => named(name),
            }
        };
        Ok(match tag {
            TypeTag::Scalar(scalar) => javascript_scalar(*scalar).to_string(),
            TypeTag::String | TypeTag::StringRef | TypeTag::StringMix => "string".to_string(),
            TypeTag::Enum(name) | TypeTag::Class(name) | TypeTag::ClassRef(name) | TypeTag::ClassMix(name) => {
                named(name)?
            }
            TypeTag::ClassPtr(name) | TypeTag::ClassPtrRef(name) | TypeTag::ClassPtrMix(name) => {
                format!("{} | null", named(name)?)
            }
            TypeTag::Array(e) | TypeTag::ArrayRef(e) | TypeTag::ArrayMix(e) => format!("{}[]", element(e)?),
            TypeTag::ArrayPtr(name) | TypeTag::ArrayPtrRef(name) | TypeTag::ArrayPtrMix(name) => {
                format!("{}[]", named(name)?)
            }
        })
    }
}

pub fn cxx_scalar(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Int8 => "std::int8_t",
        Scalar::Int16 => "std::int16_t",
        Scalar::Int32 => "std::int32_t",
        Scalar::Int64 => "std::int64_t",
        Scalar::UInt8 => "std::uint8_t",
        Scalar::UInt16 => "std::uint16_t",
        Scalar::UInt32 => "std::uint32_t",
        Scalar::UInt64 => "std::uint64_t",
        Scalar::Float => "float",
        Scalar::Double => "double",
        Scalar::Boolean => "bool",
    }
}

/// C spelling; booleans cross the ABI as `uint8_t`.
pub fn c_scalar(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Int8 => "int8_t",
        Scalar::Int16 => "int16_t",
        Scalar::Int32 => "int32_t",
        Scalar::Int64 => "int64_t",
        Scalar::UInt8 | Scalar::Boolean => "uint8_t",
        Scalar::UInt16 => "uint16_t",
        Scalar::UInt32 => "uint32_t",
        Scalar::UInt64 => "uint64_t",
        Scalar::Float => "float",
        Scalar::Double => "double",
    }
}

fn swift_scalar(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Int8 => "Int8",
        Scalar::Int16 => "Int16",
        Scalar::Int32 => "Int32",
        Scalar::Int64 => "Int64",
        Scalar::UInt8 => "UInt8",
        Scalar::UInt16 => "UInt16",
        Scalar::UInt32 => "UInt32",
        Scalar::UInt64 => "UInt64",
        Scalar::Float => "Float",
        Scalar::Double => "Double",
        Scalar::Boolean => "Bool",
    }
}

fn javascript_scalar(scalar: Scalar) -> &'static str {
    match scalar {
        Scalar::Boolean => "boolean",
        _ => "number",
    }
}

#[cfg(test)]
mod tests {
    use gentool_core::EntityKind;
    use gentool_schema::{TypeIndex, normalize_class, normalize_enum};
    use serde_json::json;

    use super::*;

    fn registry() -> Registry {
        let mut index = TypeIndex::new();
        index.declare("vector3", EntityKind::Class);
        index.declare("landmark_type", EntityKind::Enum);

        let mut registry = Registry::new();
        registry.insert_class(normalize_class(&json!({ "name": "vector3" }), &index).unwrap());
        registry.insert_enum(normalize_enum(&json!({ "name": "landmark_type" })).unwrap());
        registry
    }

    fn tag(s: &str, registry: &Registry) -> TypeTag {
        TypeTag::parse(s, registry).unwrap()
    }

    #[test]
    fn test_cxx_borrow_shapes() {
        let registry = registry();
        let speller = TypeSpeller::new(&registry);

        let class_ref = tag("CLASS_REF:vector3", &registry);
        assert_eq!(speller.spell(&class_ref, Language::Cxx, UseSite::Any).unwrap(), "Vector3");
        assert_eq!(speller.spell(&class_ref, Language::Cxx, UseSite::Getter).unwrap(), "const Vector3&");
        assert_eq!(speller.spell(&class_ref, Language::Cxx, UseSite::Setter).unwrap(), "const Vector3&");

        let mix = tag("string_mix", &registry);
        assert_eq!(speller.spell(&mix, Language::Cxx, UseSite::Getter).unwrap(), "const std::string&");
        assert_eq!(speller.spell(&mix, Language::Cxx, UseSite::Setter).unwrap(), "std::string");

        let owned = tag("string", &registry);
        assert_eq!(speller.spell(&owned, Language::Cxx, UseSite::Getter).unwrap(), "std::string");
    }

    #[test]
    fn test_cxx_qualified_containers() {
        let registry = registry();
        let speller = TypeSpeller::new(&registry).qualified(true);
        let array = tag("ARRAY_PTR:vector3", &registry);
        assert_eq!(
            speller.spell(&array, Language::Cxx, UseSite::Any).unwrap(),
            "std::vector<std::shared_ptr<psm::Vector3>>"
        );
        let scalar = tag("uint16", &registry);
        assert_eq!(speller.spell(&scalar, Language::Cxx, UseSite::Getter).unwrap(), "std::uint16_t");
    }

    #[test]
    fn test_c_array_of_class() {
        let registry = registry();
        let speller = TypeSpeller::new(&registry);
        let array = tag("ARRAY:vector3", &registry);
        assert_eq!(speller.spell(&array, Language::C, UseSite::Getter).unwrap(), "psm_vector3_t**");
        assert_eq!(
            speller.spell(&array, Language::C, UseSite::Setter).unwrap(),
            "const psm_vector3_t* const*"
        );
    }

    #[test]
    fn test_c_scalars_enums_and_handles() {
        let registry = registry();
        let speller = TypeSpeller::new(&registry);
        assert_eq!(speller.spell(&tag("boolean", &registry), Language::C, UseSite::Any).unwrap(), "uint8_t");
        assert_eq!(
            speller.spell(&tag("ENUM:landmark_type", &registry), Language::C, UseSite::Getter).unwrap(),
            "psm_landmark_type_e"
        );
        assert_eq!(
            speller.spell(&tag("CLASS_PTR:vector3", &registry), Language::C, UseSite::Setter).unwrap(),
            "const psm_vector3_ref_t*"
        );
    }

    #[test]
    fn test_binding_languages() {
        let registry = registry();
        let speller = TypeSpeller::new(&registry);
        let handle = tag("CLASS_PTR:vector3", &registry);
        assert_eq!(speller.spell(&handle, Language::ObjectiveC, UseSite::Any).unwrap(), "PSMVector3*");
        assert_eq!(speller.spell(&handle, Language::Swift, UseSite::Any).unwrap(), "Vector3?");
        assert_eq!(speller.spell(&handle, Language::JavaScript, UseSite::Any).unwrap(), "Vector3 | null");

        let strings = tag("ARRAY:string", &registry);
        assert_eq!(speller.spell(&strings, Language::ObjectiveC, UseSite::Any).unwrap(), "NSArray<NSString*>*");
        assert_eq!(speller.spell(&strings, Language::Swift, UseSite::Any).unwrap(), "[String]");
        assert_eq!(speller.spell(&strings, Language::JavaScript, UseSite::Any).unwrap(), "string[]");
    }

    #[test]
    fn test_unknown_type_tag() {
        let registry = Registry::new();
        let speller = TypeSpeller::new(&registry);
        let dangling = TypeTag::Class("ghost".to_string());
        let err = speller.spell(&dangling, Language::Cxx, UseSite::Any).unwrap_err();
        assert_eq!(
            err,
            SpellError::UnknownTypeTag {
                tag: "CLASS:ghost".to_string(),
                name: "ghost".to_string()
            }
        );
    }
}
