//! Name resolution across documents.

use gentool_core::{EntityKind, TypeLookup};
use indexmap::IndexMap;
use serde_json::Value;

use crate::{ClassDef, EnumDef};

/// Declared entity names, collected before any document is normalized so
/// that type tags may reference entities in any order.
#[derive(Debug, Clone, Default)]
pub struct TypeIndex {
    entries: IndexMap<String, EntityKind>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. Returns the kind already registered under the
    /// same name, leaving the index unchanged in that case.
    pub fn declare(&mut self, name: impl Into<String>, kind: EntityKind) -> Option<EntityKind> {
        let name = name.into();
        if let Some(existing) = self.entries.get(&name) {
            return Some(*existing);
        }
        self.entries.insert(name, kind);
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeLookup for TypeIndex {
    fn entity_kind(&self, name: &str) -> Option<EntityKind> {
        self.entries.get(name).copied()
    }
}

/// The `name` a raw document declares, if it has a string one.
pub fn declared_name(document: &Value) -> Option<&str> {
    document.get("name").and_then(Value::as_str)
}

/// A normalized entity borrowed from the [`Registry`].
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Enum(&'a EnumDef),
    Class(&'a ClassDef),
}

impl<'a> Entity<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Enum(_) => EntityKind::Enum,
            Entity::Class(_) => EntityKind::Class,
        }
    }

    pub fn name(&self) -> &'a crate::Name {
        match self {
            Entity::Enum(def) => &def.name,
            Entity::Class(def) => &def.name,
        }
    }
}

/// Read-only set of normalized entities consumed by the emitters.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    enums: IndexMap<String, EnumDef>,
    classes: IndexMap<String, ClassDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_enum(&mut self, def: EnumDef) {
        self.enums.insert(def.name.canonical().to_string(), def);
    }

    pub fn insert_class(&mut self, def: ClassDef) {
        self.classes.insert(def.name.canonical().to_string(), def);
    }

    pub fn get(&self, name: &str) -> Option<Entity<'_>> {
        self.enums
            .get(name)
            .map(Entity::Enum)
            .or_else(|| self.classes.get(name).map(Entity::Class))
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums.get(name)
    }

    pub fn class_def(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDef> {
        self.enums.values()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.enums.len() + self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.classes.is_empty()
    }
}

impl TypeLookup for Registry {
    fn entity_kind(&self, name: &str) -> Option<EntityKind> {
        self.get(name).map(|entity| entity.kind())
    }
}
