use gentool_core::{PLACEHOLDER, substitute};

use super::property::Property;
use crate::{Overridable, Result, reader::Node};

/// One property taking part in equality or hashing.
///
/// `expression` is a projection template: the placeholder is replaced with
/// the member or getter access and the result is compared or hashed.
/// With `dereference` set the projection yields shared pointers (one, or a
/// vector of them) and the pointees are compared or hashed, null-aware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorProperty {
    pub name: String,
    pub expression: Overridable<String>,
    pub placeholder: Overridable<String>,
    pub use_getter: Overridable<bool>,
    pub dereference: Overridable<bool>,
}

impl OperatorProperty {
    /// The projection applied to `access`.
    pub fn apply(&self, access: &str) -> String {
        substitute(self.expression.value(), self.placeholder.value(), access)
    }

    /// Expression with its placeholder rewritten to the default one, so that
    /// templates using different placeholders compare equal.
    pub fn normalized_expression(&self) -> String {
        self.apply(PLACEHOLDER)
    }
}

/// Document keys of an operator property list.
struct EntryKeys {
    list: &'static str,
    expression: &'static str,
    placeholder: &'static str,
}

const COMPARED: EntryKeys = EntryKeys {
    list: "comparedProperties",
    expression: "comparator",
    placeholder: "comparatorPlaceholder",
};

const HASHED: EntryKeys = EntryKeys {
    list: "hashedProperties",
    expression: "hasher",
    placeholder: "hasherPlaceholder",
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityOperator {
    pub defined: Overridable<bool>,
    pub compare_pointers: Overridable<bool>,
    pub compared_properties: Overridable<Vec<OperatorProperty>>,
    pub custom: Overridable<bool>,
    pub custom_inequality: Overridable<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashOperator {
    pub defined: Overridable<bool>,
    pub use_pointer_as_hash: Overridable<bool>,
    pub hashed_properties: Overridable<Vec<OperatorProperty>>,
    pub custom: Overridable<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToStringOperator {
    pub defined: Overridable<bool>,
    pub custom: Overridable<bool>,
}

/// Pointer members are deep-copied, so identity follows the pointee.
fn dereferences(property: &Property) -> bool {
    property.type_tag.is_class_ptr() || property.type_tag.is_array_ptr()
}

/// Whether a property can be reached by a generated operator at all.
fn is_operand(property: &Property) -> bool {
    !property.is_static.get() && (property.has_member_var.get() || property.getter.present.get())
}

fn read_defined(node: &Node<'_>, is_static: bool, default: impl FnOnce() -> bool) -> Result<Overridable<bool>> {
    let defined = node.flag_or("defined", default)?;
    if is_static && defined.get() {
        return Err(node.invalid_value("defined", "true", "static classes have no instances to operate on"));
    }
    Ok(defined)
}

impl EqualityOperator {
    pub(crate) fn read(
        parent: &Node<'_>,
        is_static: bool,
        copyable: bool,
        properties: &[Property],
    ) -> Result<Self> {
        let node = parent.object_or_empty("equalityOperator")?;

        let defined = read_defined(&node, is_static, || !is_static)?;
        let compare_pointers = node.flag_or("comparePointers", || !copyable)?;

        let compared_properties = match read_entries(&node, &COMPARED, properties, |_| None)? {
            Some(entries) => Overridable::explicit(entries),
            None if compare_pointers.get() || !defined.get() => Overridable::generated(Vec::new()),
            None => Overridable::generated(
                properties
                    .iter()
                    .filter(|p| is_operand(p) && p.part_of_identity.get())
                    .map(|p| OperatorProperty {
                        name: p.name.canonical().to_string(),
                        expression: Overridable::generated(PLACEHOLDER.to_string()),
                        placeholder: Overridable::generated(PLACEHOLDER.to_string()),
                        use_getter: Overridable::generated(!p.has_member_var.get()),
                        dereference: Overridable::generated(dereferences(p)),
                    })
                    .collect(),
            ),
        };

        let custom = node.flag_or("custom", || false)?;
        let custom_inequality = node.flag_or("customInequality", || custom.get())?;

        Ok(EqualityOperator {
            defined,
            compare_pointers,
            compared_properties,
            custom,
            custom_inequality,
        })
    }

    pub fn compared(&self, name: &str) -> Option<&OperatorProperty> {
        self.compared_properties.iter().find(|p| p.name == name)
    }
}

impl HashOperator {
    pub(crate) fn read(
        parent: &Node<'_>,
        is_static: bool,
        equality: &EqualityOperator,
        properties: &[Property],
    ) -> Result<Self> {
        let node = parent.object_or_empty("hashOperator")?;

        let defined = read_defined(&node, is_static, || equality.defined.get())?;
        if defined.get() && !equality.defined.get() {
            return Err(node.invalid_value(
                "defined",
                "true",
                "a hash requires a defined equality operator",
            ));
        }

        let use_pointer_as_hash = node.flag_or("usePointerAsHash", || equality.compare_pointers.get())?;
        if use_pointer_as_hash.get() && !equality.compare_pointers.get() {
            return Err(node.invalid_value(
                "usePointerAsHash",
                "true",
                "hashing the pointer requires equality to compare pointers",
            ));
        }

        let paired = |name: &str| equality.compared(name);
        let hashed_properties = match read_entries(&node, &HASHED, properties, paired)? {
            Some(entries) => Overridable::explicit(entries),
            None if use_pointer_as_hash.get() || !defined.get() => Overridable::generated(Vec::new()),
            None => Overridable::generated(
                equality
                    .compared_properties
                    .iter()
                    .map(|compared| OperatorProperty {
                        name: compared.name.clone(),
                        expression: Overridable::generated(compared.expression.value().clone()),
                        placeholder: Overridable::generated(compared.placeholder.value().clone()),
                        use_getter: Overridable::generated(compared.use_getter.get()),
                        dereference: Overridable::generated(compared.dereference.get()),
                    })
                    .collect(),
            ),
        };

        if !equality.compare_pointers.get() {
            for (index, hashed) in hashed_properties.iter().enumerate() {
                if equality.compared(&hashed.name).is_none() {
                    return Err(node.invalid_value(
                        &format!("{}[{}].name", HASHED.list, index),
                        hashed.name.as_str(),
                        "every hashed property must also be compared for equality",
                    ));
                }
            }
        }

        let custom = node.flag_or("custom", || false)?;

        Ok(HashOperator {
            defined,
            use_pointer_as_hash,
            hashed_properties,
            custom,
        })
    }
}

impl ToStringOperator {
    pub(crate) fn read(parent: &Node<'_>, is_static: bool) -> Result<Self> {
        let node = parent.object_or_empty("toStringOperator")?;
        let defined = read_defined(&node, is_static, || !is_static)?;
        let custom = node.flag_or("custom", || false)?;
        Ok(ToStringOperator { defined, custom })
    }
}

/// Read an explicit property list. `paired` supplies the entry the defaults
/// of each element are taken from, if any.
fn read_entries<'p>(
    node: &Node<'_>,
    keys: &EntryKeys,
    properties: &[Property],
    paired: impl Fn(&str) -> Option<&'p OperatorProperty>,
) -> Result<Option<Vec<OperatorProperty>>> {
    let Some(items) = node.objects(keys.list)? else {
        return Ok(None);
    };

    let mut entries: Vec<OperatorProperty> = Vec::with_capacity(items.len());
    for item in &items {
        let name = item.required_str("name")?;
        let Some(target) = properties.iter().find(|p| p.name.canonical() == name) else {
            return Err(item.invalid_value("name", name, "no property with this name exists"));
        };
        if !is_operand(target) {
            return Err(item.invalid_value(
                "name",
                name,
                "the property is static or has neither a member variable nor a getter",
            ));
        }
        if entries.iter().any(|e| e.name == name) {
            return Err(item.invalid_value("name", name, "the property is already listed"));
        }

        let pair = paired(name);
        let expression = item.string_or(keys.expression, || {
            pair.map_or_else(|| PLACEHOLDER.to_string(), |p| p.expression.value().clone())
        })?;
        let placeholder = item.string_or(keys.placeholder, || {
            pair.map_or_else(|| PLACEHOLDER.to_string(), |p| p.placeholder.value().clone())
        })?;
        let use_getter = item.flag_or("useGetter", || {
            pair.map_or_else(|| !target.has_member_var.get(), |p| p.use_getter.get())
        })?;
        if use_getter.get() && !target.getter.present.get() {
            return Err(item.invalid_value("useGetter", "true", "the property has no getter"));
        }
        if !use_getter.get() && !target.has_member_var.get() {
            return Err(item.invalid_value("useGetter", "false", "the property has no member variable"));
        }
        let dereference = item.flag_or("dereference", || {
            pair.map_or_else(|| dereferences(target), |p| p.dereference.get())
        })?;
        if dereference.get() && !dereferences(target) {
            return Err(item.invalid_value("dereference", "true", "the property does not hold shared pointers"));
        }

        entries.push(OperatorProperty {
            name: name.to_string(),
            expression,
            placeholder,
            use_getter,
            dereference,
        });
    }
    Ok(Some(entries))
}
