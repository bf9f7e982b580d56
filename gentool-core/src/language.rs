//! Target languages and the per-role naming tables.

use std::fmt;

use crate::naming::{NameStyle, NamingError, styled_name};

/// Placeholder in a wrap template that receives the styled name.
pub const WRAP_PLACEHOLDER: char = '%';

/// A binding language that names are projected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Cxx,
    C,
    ObjectiveC,
    Swift,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::Cxx,
        Language::C,
        Language::ObjectiveC,
        Language::Swift,
        Language::JavaScript,
    ];

    /// Key used for this language in schema documents (`name.lang.<key>`).
    pub fn key(self) -> &'static str {
        match self {
            Language::Cxx => "cPlusPlus",
            Language::C => "c",
            Language::ObjectiveC => "objectiveC",
            Language::Swift => "swift",
            Language::JavaScript => "javaScript",
        }
    }

    fn index(self) -> usize {
        match self {
            Language::Cxx => 0,
            Language::C => 1,
            Language::ObjectiveC => 2,
            Language::Swift => 3,
            Language::JavaScript => 4,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// What a name is used for. Each role has a default style and wrap
/// template per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameRole {
    Class,
    Property,
    Getter,
    Setter,
    SetterArg,
    FuncArg,
    EnumConstant,
}

struct RoleTable {
    templates: [&'static str; 5],
    styles: [NameStyle; 5],
}

use NameStyle::{CamelBack, CamelCase, LowerCase, UpperCase};

const CLASS: RoleTable = RoleTable {
    templates: ["%", "psm_%_t", "PSM%", "%", "%"],
    styles: [CamelCase, LowerCase, CamelCase, CamelCase, CamelCase],
};

const PROPERTY: RoleTable = RoleTable {
    templates: ["m_%", "%", "%", "%", "%"],
    styles: [CamelBack, LowerCase, CamelBack, CamelBack, CamelBack],
};

const GETTER: RoleTable = RoleTable {
    templates: ["get%", "get_%", "%", "get%", "get%"],
    styles: [CamelCase, LowerCase, CamelBack, CamelCase, CamelCase],
};

const SETTER: RoleTable = RoleTable {
    templates: ["set%", "set_%", "set%", "set%", "set%"],
    styles: [CamelCase, LowerCase, CamelCase, CamelCase, CamelCase],
};

const ARGUMENT: RoleTable = RoleTable {
    templates: ["%", "%", "%", "%", "%"],
    styles: [CamelBack, LowerCase, CamelBack, CamelBack, CamelBack],
};

const ENUM_CONSTANT: RoleTable = RoleTable {
    templates: ["%", "%", "%", "%", "%"],
    styles: [CamelCase, UpperCase, CamelCase, CamelBack, CamelCase],
};

impl NameRole {
    fn table(self) -> &'static RoleTable {
        match self {
            NameRole::Class => &CLASS,
            NameRole::Property => &PROPERTY,
            NameRole::Getter => &GETTER,
            NameRole::Setter => &SETTER,
            NameRole::SetterArg | NameRole::FuncArg => &ARGUMENT,
            NameRole::EnumConstant => &ENUM_CONSTANT,
        }
    }

    /// Default style for this role in the given language.
    pub fn default_style(self, language: Language) -> NameStyle {
        self.table().styles[language.index()]
    }

    /// Wrap template for this role in the given language.
    pub fn template(self, language: Language) -> &'static str {
        self.table().templates[language.index()]
    }
}

/// Substitute a styled name into a wrap template.
pub fn wrap(template: &str, styled: &str) -> String {
    template.replace(WRAP_PLACEHOLDER, styled)
}

/// Style a canonical name for a language and role, then apply the role's
/// wrap template.
///
/// ```
/// use gentool_core::{Language, NameRole, language_name};
///
/// assert_eq!(language_name("vector3f", Language::C, NameRole::Class).unwrap(), "psm_vector3f_t");
/// assert_eq!(language_name("pos_x", Language::Cxx, NameRole::Getter).unwrap(), "getPosX");
/// ```
pub fn language_name(name: &str, language: Language, role: NameRole) -> Result<String, NamingError> {
    let styled = styled_name(name, role.default_style(language))?;
    Ok(wrap(role.template(language), &styled))
}
