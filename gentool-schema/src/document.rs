//! Serialization of normalized entities back to schema documents.
//!
//! Every resolved field is written, so the output describes the entity
//! completely and can be normalized again with the same result. With
//! provenance enabled each field `key` is followed by `key.gen`, which is
//! true for values the defaulting engine generated.

use serde_json::{Map, Value, json};

use crate::{
    Accessor, ClassDef, Constructor, EnumDef, Keyword, Name, Overridable, Property,
    interface::{InitializedProperty, OperatorProperty},
};

/// Suffix of provenance marker keys.
pub const PROVENANCE_SUFFIX: &str = ".gen";

#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentWriter {
    provenance: bool,
}

/// Builder for one JSON object.
struct Object<'w> {
    writer: &'w DocumentWriter,
    map: Map<String, Value>,
}

impl<'w> Object<'w> {
    fn new(writer: &'w DocumentWriter) -> Self {
        Self {
            writer,
            map: Map::new(),
        }
    }

    fn raw(&mut self, key: &str, value: Value) -> &mut Self {
        self.map.insert(key.to_string(), value);
        self
    }

    fn field<T>(&mut self, key: &str, field: &Overridable<T>, to_value: impl FnOnce(&T) -> Value) -> &mut Self {
        self.map.insert(key.to_string(), to_value(field.value()));
        if self.writer.provenance {
            self.map
                .insert(format!("{key}{PROVENANCE_SUFFIX}"), Value::Bool(field.is_generated()));
        }
        self
    }

    fn flag(&mut self, key: &str, field: &Overridable<bool>) -> &mut Self {
        self.field(key, field, |b| Value::Bool(*b))
    }

    fn string(&mut self, key: &str, field: &Overridable<String>) -> &mut Self {
        self.field(key, field, |s| Value::String(s.clone()))
    }

    fn keyword<K: Keyword>(&mut self, key: &str, field: &Overridable<K>) -> &mut Self {
        self.field(key, field, |k| Value::String(k.keyword().to_string()))
    }

    fn lines(&mut self, key: &str, field: &Overridable<Vec<String>>) -> &mut Self {
        self.field(key, field, |lines| json!(lines))
    }

    fn name(&mut self, key: &str, name: &Name) -> &mut Self {
        self.string(key, name.canonical_field());
        for (style, value) in name.styles() {
            self.string(&format!("{key}.style.{}", style.key()), value);
        }
        for (language, value) in name.languages() {
            self.string(&format!("{key}.lang.{}", language.key()), value);
        }
        self
    }

    fn finish(&mut self) -> Value {
        Value::Object(std::mem::take(&mut self.map))
    }
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also write `<key>.gen` provenance markers.
    pub fn with_provenance(mut self, provenance: bool) -> Self {
        self.provenance = provenance;
        self
    }

    fn object(&self) -> Object<'_> {
        Object::new(self)
    }

    fn aliases(&self, aliases: &[Name]) -> Value {
        Value::Array(
            aliases
                .iter()
                .map(|alias| self.object().name("name", alias).finish())
                .collect(),
        )
    }

    pub fn enum_document(&self, def: &EnumDef) -> Value {
        let constants: Vec<Value> = def
            .constants
            .iter()
            .map(|constant| {
                self.object()
                    .name("name", &constant.name)
                    .field("value", &constant.value, |v| json!(v))
                    .finish()
            })
            .collect();

        self.object()
            .name("name", &def.name)
            .keyword("type", &def.kind)
            .raw("constants", Value::Array(constants))
            .field("aliases", &def.aliases, |a| self.aliases(a))
            .string("headerGuardName", &def.header_guard)
            .finish()
    }

    pub fn class_document(&self, def: &ClassDef) -> Value {
        let properties: Vec<Value> = def.properties.iter().map(|p| self.property(p)).collect();

        self.object()
            .name("name", &def.name)
            .flag("static", &def.is_static)
            .flag("final", &def.is_final)
            .field("aliases", &def.aliases, |a| self.aliases(a))
            .string("headerGuardName", &def.header_guard)
            .raw("properties", Value::Array(properties))
            .flag("copyable", &def.copyable)
            .flag("movable", &def.movable)
            .raw("parameterlessConstructor", self.constructor(&def.parameterless_constructor))
            .raw("copyConstructor", self.constructor(&def.copy_constructor))
            .raw("moveConstructor", self.constructor(&def.move_constructor))
            .raw("destructor", self.destructor(def))
            .raw("equalityOperator", self.equality(def))
            .raw("hashOperator", self.hash(def))
            .raw(
                "toStringOperator",
                self.object()
                    .flag("defined", &def.to_string_operator.defined)
                    .flag("custom", &def.to_string_operator.custom)
                    .finish(),
            )
            .flag("cGenerateFuncAliasDefines", &def.c_generate_func_alias_defines)
            .finish()
    }

    fn property(&self, property: &Property) -> Value {
        let mut object = self.object();
        object
            .name("name", &property.name)
            .raw("type", Value::String(property.type_tag.to_string()))
            .flag("static", &property.is_static);
        write_accessor(&mut object, "hasGetter", "getter", &property.getter);
        write_accessor(&mut object, "hasSetter", "setter", &property.setter);
        object
            .name("setterArgName", &property.setter_arg_name)
            .flag("hasMemberVar", &property.has_member_var)
            .string("defaultValue", &property.default_value)
            .flag("partOfIdentity", &property.part_of_identity)
            .finish()
    }

    fn constructor(&self, ctor: &Constructor) -> Value {
        let initialized = |entries: &Vec<InitializedProperty>| {
            Value::Array(
                entries
                    .iter()
                    .map(|entry| {
                        self.object()
                            .raw("name", Value::String(entry.name.clone()))
                            .string("value", &entry.value)
                            .string("valuePlaceholder", &entry.placeholder)
                            .flag("initializeInBody", &entry.in_body)
                            .finish()
                    })
                    .collect(),
            )
        };

        let mut object = self.object();
        object
            .field("initializedProperties", &ctor.initialized_properties, initialized)
            .lines("codeFront", &ctor.code_front)
            .lines("codeBack", &ctor.code_back)
            .keyword("definition", &ctor.definition)
            .keyword("visibility", &ctor.visibility)
            .flag("noexcept", &ctor.noexcept)
            .flag("custom", &ctor.custom);
        if let Some(assignment) = &ctor.assignment {
            object
                .name("mainArgName", &assignment.main_arg_name)
                .lines("operatorCodeFront", &assignment.code_front)
                .lines("operatorCodeBack", &assignment.code_back)
                .flag("customOperator", &assignment.custom);
        }
        object.finish()
    }

    fn destructor(&self, def: &ClassDef) -> Value {
        let destructor = &def.destructor;
        self.object()
            .flag("virtual", &destructor.is_virtual)
            .lines("code", &destructor.code)
            .keyword("definition", &destructor.definition)
            .keyword("visibility", &destructor.visibility)
            .flag("custom", &destructor.custom)
            .finish()
    }

    fn operator_properties(&self, entries: &[OperatorProperty], expression: &str, placeholder: &str) -> Value {
        Value::Array(
            entries
                .iter()
                .map(|entry| {
                    self.object()
                        .raw("name", Value::String(entry.name.clone()))
                        .string(expression, &entry.expression)
                        .string(placeholder, &entry.placeholder)
                        .flag("useGetter", &entry.use_getter)
                        .flag("dereference", &entry.dereference)
                        .finish()
                })
                .collect(),
        )
    }

    fn equality(&self, def: &ClassDef) -> Value {
        let equality = &def.equality_operator;
        self.object()
            .flag("defined", &equality.defined)
            .flag("comparePointers", &equality.compare_pointers)
            .field("comparedProperties", &equality.compared_properties, |entries| {
                self.operator_properties(entries, "comparator", "comparatorPlaceholder")
            })
            .flag("custom", &equality.custom)
            .flag("customInequality", &equality.custom_inequality)
            .finish()
    }

    fn hash(&self, def: &ClassDef) -> Value {
        let hash = &def.hash_operator;
        self.object()
            .flag("defined", &hash.defined)
            .flag("usePointerAsHash", &hash.use_pointer_as_hash)
            .field("hashedProperties", &hash.hashed_properties, |entries| {
                self.operator_properties(entries, "hasher", "hasherPlaceholder")
            })
            .flag("custom", &hash.custom)
            .finish()
    }
}

fn write_accessor(object: &mut Object<'_>, presence_key: &str, prefix: &str, accessor: &Accessor) {
    object
        .flag(presence_key, &accessor.present)
        .name(&format!("{prefix}Name"), &accessor.name)
        .flag(&format!("{prefix}Const"), &accessor.is_const)
        .flag(&format!("{prefix}Noexcept"), &accessor.noexcept)
        .keyword(&format!("{prefix}Mode"), &accessor.mode)
        .flag(&format!("{prefix}Custom"), &accessor.custom)
        .keyword(&format!("{prefix}Visibility"), &accessor.visibility);
}
