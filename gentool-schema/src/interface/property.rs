use gentool_core::{NameRole, TypeLookup, TypeTag, TypeTagError};

use crate::{Error, Keyword, MethodMode, Name, Overridable, Result, Visibility, reader::Node};

/// A class property and its accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: Name,
    pub type_tag: TypeTag,
    pub is_static: Overridable<bool>,
    pub getter: Accessor,
    pub setter: Accessor,
    pub setter_arg_name: Name,
    pub has_member_var: Overridable<bool>,
    pub default_value: Overridable<String>,
    pub part_of_identity: Overridable<bool>,
}

/// Getter or setter of a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub present: Overridable<bool>,
    pub name: Name,
    pub is_const: Overridable<bool>,
    pub noexcept: Overridable<bool>,
    pub mode: Overridable<MethodMode>,
    pub custom: Overridable<bool>,
    pub visibility: Overridable<Visibility>,
}

impl Accessor {
    /// Present and reachable from outside the class.
    pub fn is_public(&self) -> bool {
        self.present.get() && self.visibility.get() == Visibility::Public
    }

    /// Present and implemented by generated code.
    pub fn is_generated(&self) -> bool {
        self.present.get() && !self.custom.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessorKind {
    Getter,
    Setter,
}

impl AccessorKind {
    fn prefix(self) -> &'static str {
        match self {
            AccessorKind::Getter => "getter",
            AccessorKind::Setter => "setter",
        }
    }

    fn key(self, suffix: &str) -> String {
        format!("{}{}", self.prefix(), suffix)
    }

    fn presence_key(self) -> &'static str {
        match self {
            AccessorKind::Getter => "hasGetter",
            AccessorKind::Setter => "hasSetter",
        }
    }

    fn role(self) -> NameRole {
        match self {
            AccessorKind::Getter => NameRole::Getter,
            AccessorKind::Setter => NameRole::Setter,
        }
    }
}

impl Property {
    pub(crate) fn read(node: &Node<'_>, class_static: bool, types: &dyn TypeLookup) -> Result<Self> {
        let name = Name::read(node, "name", NameRole::Property)?;
        let type_tag = read_type_tag(node, types)?;

        let is_static = node.flag_or("static", || class_static)?;
        if class_static && !is_static.get() {
            return Err(node.invalid_value(
                "static",
                "false",
                "a static class can only declare static properties",
            ));
        }

        let getter = Accessor::read(node, AccessorKind::Getter, &name, &type_tag, is_static.get())?;
        let setter = Accessor::read(node, AccessorKind::Setter, &name, &type_tag, is_static.get())?;
        let setter_arg_name = Name::read_or(node, "setterArgName", name.canonical(), NameRole::SetterArg)?;

        let has_member_var =
            node.flag_or("hasMemberVar", || !getter.custom.get() || !setter.custom.get())?;
        let default_value = node.string_or("defaultValue", String::new)?;
        let part_of_identity = node.flag_or("partOfIdentity", || !is_static.get())?;

        Ok(Property {
            name,
            type_tag,
            is_static,
            getter,
            setter,
            setter_arg_name,
            has_member_var,
            default_value,
            part_of_identity,
        })
    }

    /// Instance property backed by a member variable.
    pub fn is_instance_member(&self) -> bool {
        !self.is_static.get() && self.has_member_var.get()
    }
}

fn read_type_tag(node: &Node<'_>, types: &dyn TypeLookup) -> Result<TypeTag> {
    let raw = node.required_str("type")?;
    TypeTag::parse(raw, types).map_err(|e| match e {
        TypeTagError::UnresolvedReference(reference) => {
            Error::unknown_type_reference(node.key_path("type"), reference)
        }
        other => node.invalid_value("type", raw, other.to_string()),
    })
}

impl Accessor {
    fn read(
        node: &Node<'_>,
        kind: AccessorKind,
        property: &Name,
        tag: &TypeTag,
        is_static: bool,
    ) -> Result<Self> {
        let present = node.flag_or(kind.presence_key(), || true)?;
        let name = Name::read_or(node, &kind.key("Name"), property.canonical(), kind.role())?;

        let const_key = kind.key("Const");
        let is_const = node.flag_or(&const_key, || kind == AccessorKind::Getter && !is_static)?;
        if is_static && is_const.get() {
            return Err(node.invalid_value(&const_key, "true", "static accessors cannot be const"));
        }

        let noexcept = node.flag_or(&kind.key("Noexcept"), || tag.is_primitive() || tag.is_borrowed())?;

        let mode_key = kind.key("Mode");
        let mode = node.keyword_or(&mode_key, || MethodMode::Regular)?;
        if is_static && mode.get() != MethodMode::Regular {
            return Err(node.invalid_value(
                &mode_key,
                mode.get().keyword(),
                "static accessors cannot be dispatched dynamically",
            ));
        }

        let custom = node.flag_or(&kind.key("Custom"), || mode.get() == MethodMode::PureVirtual)?;
        let visibility = node.keyword_or(&kind.key("Visibility"), || Visibility::Public)?;

        Ok(Accessor {
            present,
            name,
            is_const,
            noexcept,
            mode,
            custom,
            visibility,
        })
    }
}
