//! Interface (class) documents.

mod constructor;
mod destructor;
mod operators;
mod property;

pub use constructor::{Assignment, Constructor, ConstructorKind, InitializedProperty};
pub use destructor::Destructor;
pub use operators::{EqualityOperator, HashOperator, OperatorProperty, ToStringOperator};
pub use property::{Accessor, Property};

use constructor::ConstructorContext;
use gentool_core::{NameRole, TypeLookup};
use serde_json::Value;

use crate::{
    MethodMode, Name, Overridable, Result,
    common::{read_aliases, read_header_guard},
    reader::Node,
};

/// A normalized interface document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: Name,
    pub is_static: Overridable<bool>,
    pub is_final: Overridable<bool>,
    pub aliases: Overridable<Vec<Name>>,
    pub header_guard: Overridable<String>,
    pub properties: Vec<Property>,
    pub copyable: Overridable<bool>,
    pub movable: Overridable<bool>,
    pub parameterless_constructor: Constructor,
    pub copy_constructor: Constructor,
    pub move_constructor: Constructor,
    pub destructor: Destructor,
    pub equality_operator: EqualityOperator,
    pub hash_operator: HashOperator,
    pub to_string_operator: ToStringOperator,
    pub c_generate_func_alias_defines: Overridable<bool>,
}

impl ClassDef {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name.canonical() == name)
    }

    pub fn constructor(&self, kind: ConstructorKind) -> &Constructor {
        match kind {
            ConstructorKind::Parameterless => &self.parameterless_constructor,
            ConstructorKind::Copy => &self.copy_constructor,
            ConstructorKind::Move => &self.move_constructor,
        }
    }

    /// Whether any accessor is dispatched dynamically.
    pub fn has_virtual_accessors(&self) -> bool {
        has_virtual_accessors(&self.properties)
    }
}

fn has_virtual_accessors(properties: &[Property]) -> bool {
    properties.iter().any(|p| {
        (p.getter.present.get() && p.getter.mode.get() != MethodMode::Regular)
            || (p.setter.present.get() && p.setter.mode.get() != MethodMode::Regular)
    })
}

/// Normalize an interface document against the known type names.
pub fn normalize_class(document: &Value, types: &dyn TypeLookup) -> Result<ClassDef> {
    let node = Node::root(document)?;
    let name = Name::read(&node, "name", NameRole::Class)?;

    let is_static = node.flag_or("static", || false)?;
    let is_final = node.flag_or("final", || is_static.get())?;
    let aliases = read_aliases(&node)?;
    let header_guard = read_header_guard(&node, &name)?;

    let properties = read_properties(&node, is_static.get(), types)?;

    let copyable = read_capability(&node, "copyable", is_static.get())?;
    let movable = read_capability(&node, "movable", is_static.get())?;

    let ctx = ConstructorContext {
        class_name: &name,
        is_static: is_static.get(),
        copyable: copyable.get(),
        movable: movable.get(),
        properties: &properties,
    };
    let parameterless_constructor = Constructor::read(&node, ConstructorKind::Parameterless, &ctx)?;
    let copy_constructor = Constructor::read(&node, ConstructorKind::Copy, &ctx)?;
    let move_constructor = Constructor::read(&node, ConstructorKind::Move, &ctx)?;

    let polymorphic = !is_final.get() && has_virtual_accessors(&properties);
    let destructor = Destructor::read(&node, is_static.get(), polymorphic)?;

    let equality_operator = EqualityOperator::read(&node, is_static.get(), copyable.get(), &properties)?;
    let hash_operator = HashOperator::read(&node, is_static.get(), &equality_operator, &properties)?;
    let to_string_operator = ToStringOperator::read(&node, is_static.get())?;

    let c_generate_func_alias_defines = node.flag_or("cGenerateFuncAliasDefines", || !aliases.is_empty())?;

    Ok(ClassDef {
        name,
        is_static,
        is_final,
        aliases,
        header_guard,
        properties,
        copyable,
        movable,
        parameterless_constructor,
        copy_constructor,
        move_constructor,
        destructor,
        equality_operator,
        hash_operator,
        to_string_operator,
        c_generate_func_alias_defines,
    })
}

fn read_properties(node: &Node<'_>, class_static: bool, types: &dyn TypeLookup) -> Result<Vec<Property>> {
    let entries = node.objects("properties")?.unwrap_or_default();
    let mut properties: Vec<Property> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let property = Property::read(entry, class_static, types)?;
        if properties.iter().any(|p| p.name.canonical() == property.name.canonical()) {
            return Err(entry.invalid_value("name", property.name.canonical(), "property names must be unique"));
        }
        properties.push(property);
    }
    Ok(properties)
}

fn read_capability(node: &Node<'_>, key: &str, is_static: bool) -> Result<Overridable<bool>> {
    let flag = node.flag_or(key, || !is_static)?;
    if is_static && flag.get() {
        return Err(node.invalid_value(key, "true", "static classes cannot be instantiated"));
    }
    Ok(flag)
}
