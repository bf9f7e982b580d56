//! Indentation configuration for code generation.

/// Width of one indentation level, in spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(u8);

impl Indent {
    /// 4-space indentation used by the C and C++ sources.
    pub const C: Self = Self(4);

    pub fn width(self) -> usize {
        usize::from(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_width() {
        assert_eq!(Indent::C.width(), 4);
    }
}
