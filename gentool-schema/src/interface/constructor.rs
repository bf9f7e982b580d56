use gentool_core::{NameRole, PLACEHOLDER, TypeTag, substitute};

use super::property::Property;
use crate::{Definition, Keyword, Name, Overridable, Result, Visibility, reader::Node};

/// Which special member a [`Constructor`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructorKind {
    Parameterless,
    Copy,
    Move,
}

impl ConstructorKind {
    pub const ALL: [ConstructorKind; 3] = [
        ConstructorKind::Parameterless,
        ConstructorKind::Copy,
        ConstructorKind::Move,
    ];

    /// Document key of the constructor object.
    pub fn key(self) -> &'static str {
        match self {
            ConstructorKind::Parameterless => "parameterlessConstructor",
            ConstructorKind::Copy => "copyConstructor",
            ConstructorKind::Move => "moveConstructor",
        }
    }

    /// Canonical initializer for a property under this constructor.
    fn canonical_value(self, property: &Property) -> String {
        match self {
            ConstructorKind::Parameterless => {
                if property.default_value.is_empty() {
                    property.type_tag.implicit_default().to_string()
                } else {
                    property.default_value.value().clone()
                }
            }
            ConstructorKind::Copy => property.type_tag.copy_expression(),
            ConstructorKind::Move => property.type_tag.move_expression(),
        }
    }

    /// Whether an initializer does what a compiler-generated member would.
    fn is_member_wise(self, tag: &TypeTag, value: &str, placeholder: &str) -> bool {
        let normalized = substitute(value, placeholder, PLACEHOLDER);
        match self {
            ConstructorKind::Parameterless => value == tag.implicit_default(),
            ConstructorKind::Copy => normalized == PLACEHOLDER,
            ConstructorKind::Move => normalized == tag.move_expression(),
        }
    }
}

/// One member initialization inside a constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializedProperty {
    pub name: String,
    pub value: Overridable<String>,
    pub placeholder: Overridable<String>,
    pub in_body: Overridable<bool>,
}

/// Assignment-operator counterpart of a copy or move constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub main_arg_name: Name,
    pub code_front: Overridable<Vec<String>>,
    pub code_back: Overridable<Vec<String>>,
    pub custom: Overridable<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub kind: ConstructorKind,
    pub initialized_properties: Overridable<Vec<InitializedProperty>>,
    pub code_front: Overridable<Vec<String>>,
    pub code_back: Overridable<Vec<String>>,
    pub definition: Overridable<Definition>,
    pub visibility: Overridable<Visibility>,
    pub noexcept: Overridable<bool>,
    pub custom: Overridable<bool>,
    /// Present for copy and move constructors.
    pub assignment: Option<Assignment>,
}

/// Class-level facts a constructor depends on.
pub(crate) struct ConstructorContext<'a> {
    pub class_name: &'a Name,
    pub is_static: bool,
    pub copyable: bool,
    pub movable: bool,
    pub properties: &'a [Property],
}

impl Constructor {
    pub(crate) fn read(
        parent: &Node<'_>,
        kind: ConstructorKind,
        ctx: &ConstructorContext<'_>,
    ) -> Result<Self> {
        let node = parent.object_or_empty(kind.key())?;

        let initialized_properties = read_initialized_properties(&node, kind, ctx.properties)?;
        let code_front = node.lines_or("codeFront", Vec::new)?;
        let code_back = node.lines_or("codeBack", Vec::new)?;
        let custom = node.flag_or("custom", || false)?;

        let assignment = match kind {
            ConstructorKind::Parameterless => None,
            ConstructorKind::Copy | ConstructorKind::Move => {
                let main_arg_name = Name::read_or(
                    &node,
                    "mainArgName",
                    ctx.class_name.canonical(),
                    NameRole::FuncArg,
                )?;
                let operator_code_front = node.lines_or("operatorCodeFront", || code_front.value().clone())?;
                let operator_code_back = node.lines_or("operatorCodeBack", || code_back.value().clone())?;
                let custom_operator = node.flag_or("customOperator", || custom.get())?;
                Some(Assignment {
                    main_arg_name,
                    code_front: operator_code_front,
                    code_back: operator_code_back,
                    custom: custom_operator,
                })
            }
        };

        let can_be_default = !custom.get()
            && code_front.is_empty()
            && code_back.is_empty()
            && assignment.as_ref().is_none_or(|a| {
                !a.custom.get() && a.code_front.is_empty() && a.code_back.is_empty()
            })
            && initialized_properties.iter().all(|entry| {
                property(ctx.properties, &entry.name).is_some_and(|p| {
                    kind.is_member_wise(&p.type_tag, entry.value.value(), entry.placeholder.value())
                })
            });

        let available = match kind {
            ConstructorKind::Parameterless => true,
            ConstructorKind::Copy => ctx.copyable,
            ConstructorKind::Move => ctx.movable,
        };

        let definition = node.keyword_or("definition", || {
            if ctx.is_static {
                match kind {
                    ConstructorKind::Parameterless => Definition::Deleted,
                    ConstructorKind::Copy | ConstructorKind::Move => Definition::Omitted,
                }
            } else if !available {
                Definition::Deleted
            } else if can_be_default {
                Definition::Default
            } else {
                Definition::Defined
            }
        })?;
        if ctx.is_static && definition.get().is_available() {
            return Err(node.invalid_value(
                "definition",
                definition.get().keyword(),
                "static classes have no instances, use 'deleted' or 'omitted'",
            ));
        }

        let visibility = node.keyword_or("visibility", || {
            if ctx.is_static && kind == ConstructorKind::Parameterless {
                Visibility::Private
            } else {
                Visibility::Public
            }
        })?;

        let noexcept = node.flag_or("noexcept", || {
            definition.get() != Definition::Deleted
                && initialized_properties
                    .iter()
                    .all(|entry| property(ctx.properties, &entry.name).is_some_and(|p| p.type_tag.is_primitive()))
        })?;

        Ok(Constructor {
            kind,
            initialized_properties,
            code_front,
            code_back,
            definition,
            visibility,
            noexcept,
            custom,
            assignment,
        })
    }
}

fn property<'a>(properties: &'a [Property], name: &str) -> Option<&'a Property> {
    properties.iter().find(|p| p.name.canonical() == name)
}

fn read_initialized_properties(
    node: &Node<'_>,
    kind: ConstructorKind,
    properties: &[Property],
) -> Result<Overridable<Vec<InitializedProperty>>> {
    let Some(entries) = node.objects("initializedProperties")? else {
        let generated = properties
            .iter()
            .filter(|p| p.is_instance_member())
            .map(|p| InitializedProperty {
                name: p.name.canonical().to_string(),
                value: Overridable::generated(kind.canonical_value(p)),
                placeholder: Overridable::generated(PLACEHOLDER.to_string()),
                in_body: Overridable::generated(false),
            })
            .collect();
        return Ok(Overridable::generated(generated));
    };

    let mut initialized: Vec<InitializedProperty> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let name = entry.required_str("name")?;
        let Some(target) = property(properties, name) else {
            return Err(entry.invalid_value("name", name, "no property with this name exists"));
        };
        if target.is_static.get() {
            return Err(entry.invalid_value("name", name, "static properties cannot be initialized by a constructor"));
        }
        if !target.has_member_var.get() {
            return Err(entry.invalid_value("name", name, "the property has no member variable to initialize"));
        }
        if initialized.iter().any(|i| i.name == name) {
            return Err(entry.invalid_value("name", name, "the property is already initialized"));
        }

        initialized.push(InitializedProperty {
            name: name.to_string(),
            value: entry.string_or("value", || kind.canonical_value(target))?,
            placeholder: entry.string_or("valuePlaceholder", || PLACEHOLDER.to_string())?,
            in_body: entry.flag_or("initializeInBody", || false)?,
        });
    }
    Ok(Overridable::explicit(initialized))
}
