//! C++ statement fragments shared by the emitters.

/// Mixing constant of the hash combiner.
pub const HASH_MIX: &str = "0x9e3779b9";

/// `result ^= (value) + 0x9e3779b9 + (result << 6) + (result >> 2);`
pub fn hash_combine(accumulator: &str, value: &str) -> String {
    format!("{accumulator} ^= ({value}) + {HASH_MIX} + ({accumulator} << 6) + ({accumulator} >> 2);")
}

/// Assertion raised when `argument` of `function` is null.
pub fn null_assert(function: &str, argument: &str) -> String {
    format!("assert(!\"{function}(): {argument} is null\");")
}

/// Guard lines returning `fallback` (or nothing) when `argument` is null.
pub fn null_guard(function: &str, argument: &str, fallback: Option<&str>) -> Vec<String> {
    let ret = match fallback {
        Some(value) => format!("    return {value};"),
        None => "    return;".to_string(),
    };
    vec![
        format!("if (!{argument}) {{"),
        format!("    {}", null_assert(function, argument)),
        ret,
        "}".to_string(),
    ]
}

/// Early return taken when `condition` does not hold.
pub fn equality_guard(condition: &str) -> Vec<String> {
    vec![
        format!("if (!({condition})) {{"),
        "    return false;".to_string(),
        "}".to_string(),
    ]
}

/// Early return taken when two operands differ.
pub fn inequality_guard(lhs: &str, rhs: &str) -> Vec<String> {
    equality_guard(&format!("{lhs} == {rhs}"))
}

/// Two shared pointers are equal when both are null, identical, or point to
/// equal values.
pub fn pointee_equals(lhs: &str, rhs: &str) -> String {
    format!("[](const auto& l, const auto& r) {{ return l == r || (l && r && *l == *r); }}({lhs}, {rhs})")
}

/// Element-wise [`pointee_equals`] over two vectors of shared pointers.
pub fn pointees_equal(lhs: &str, rhs: &str) -> String {
    format!(
        "[](const auto& l, const auto& r) {{ return std::equal(l.begin(), l.end(), r.begin(), r.end(), [](const auto& a, const auto& b) {{ return a == b || (a && b && *a == *b); }}); }}({lhs}, {rhs})"
    )
}

/// Hash of the value behind `pointer`, zero for null.
pub fn pointee_hash(pointer: &str) -> String {
    format!("{pointer} ? hash<std::decay_t<decltype(*{pointer})>> {{}}(*{pointer}) : 0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_combine() {
        assert_eq!(
            hash_combine("result", "hash<float> {}(x.m_x)"),
            "result ^= (hash<float> {}(x.m_x)) + 0x9e3779b9 + (result << 6) + (result >> 2);"
        );
    }

    #[test]
    fn test_null_guard() {
        assert_eq!(
            null_guard("psm_point_get_x", "point", Some("0.0f")),
            [
                "if (!point) {",
                "    assert(!\"psm_point_get_x(): point is null\");",
                "    return 0.0f;",
                "}",
            ]
        );
        assert_eq!(null_guard("f", "p", None)[2], "    return;");
    }

    #[test]
    fn test_inequality_guard() {
        assert_eq!(inequality_guard("m_x", "point.m_x")[0], "if (!(m_x == point.m_x)) {");
    }

    #[test]
    fn test_pointee_equals() {
        assert_eq!(
            pointee_equals("m_anchor", "landmark.m_anchor"),
            "[](const auto& l, const auto& r) { return l == r || (l && r && *l == *r); }(m_anchor, landmark.m_anchor)"
        );
        assert!(pointees_equal("m_a", "x.m_a").contains("std::equal(l.begin(), l.end(), r.begin(), r.end(),"));
    }

    #[test]
    fn test_pointee_hash() {
        assert_eq!(
            pointee_hash("element"),
            "element ? hash<std::decay_t<decltype(*element)>> {}(*element) : 0"
        );
    }
}
