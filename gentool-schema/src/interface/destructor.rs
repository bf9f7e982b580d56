use crate::{Definition, Keyword, Overridable, Result, Visibility, reader::Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destructor {
    pub is_virtual: Overridable<bool>,
    pub code: Overridable<Vec<String>>,
    pub definition: Overridable<Definition>,
    pub visibility: Overridable<Visibility>,
    pub custom: Overridable<bool>,
}

impl Destructor {
    /// `polymorphic` is true when the class is non-final and dispatches
    /// some accessor dynamically.
    pub(crate) fn read(parent: &Node<'_>, is_static: bool, polymorphic: bool) -> Result<Self> {
        let node = parent.object_or_empty("destructor")?;

        let is_virtual = node.flag_or("virtual", || polymorphic)?;
        let code = node.lines_or("code", Vec::new)?;
        let custom = node.flag_or("custom", || false)?;
        let definition = node.keyword_or("definition", || {
            if is_static {
                Definition::Omitted
            } else if !code.is_empty() || custom.get() {
                Definition::Defined
            } else {
                Definition::Default
            }
        })?;
        if is_static && definition.get().is_available() {
            return Err(node.invalid_value(
                "definition",
                definition.get().keyword(),
                "static classes have no instances, use 'deleted' or 'omitted'",
            ));
        }
        let visibility = node.keyword_or("visibility", || Visibility::Public)?;

        Ok(Destructor {
            is_virtual,
            code,
            definition,
            visibility,
            custom,
        })
    }
}
