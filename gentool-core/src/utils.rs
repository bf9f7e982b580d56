//! Expression template helpers.

/// Default substitution token in initializer, comparator and hasher templates.
pub const PLACEHOLDER: &str = "@";

/// Replace every occurrence of `placeholder` in `template` with `value`.
///
/// An empty placeholder leaves the template untouched.
pub fn substitute(template: &str, placeholder: &str, value: &str) -> String {
    if placeholder.is_empty() {
        template.to_string()
    } else {
        template.replace(placeholder, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute() {
        assert_eq!(substitute("@", PLACEHOLDER, "m_x"), "m_x");
        assert_eq!(substitute("std::move(@)", PLACEHOLDER, "other.m_x"), "std::move(other.m_x)");
        assert_eq!(substitute("$ ? *$ : 0", "$", "p"), "p ? *p : 0");
        assert_eq!(substitute("42", PLACEHOLDER, "m_x"), "42");
        assert_eq!(substitute("@", "", "m_x"), "@");
    }
}
