//! Code builder utility for generating properly indented code.

use super::Indent;

/// Mutable builder for brace-delimited code with proper indentation.
///
/// ```
/// use gentool_codegen::builder::CodeBuilder;
///
/// let mut builder = CodeBuilder::c();
/// builder.push_function("void Point::setX(float x) noexcept", |b| {
///     b.push_line("m_x = x;");
/// });
/// assert_eq!(builder.build(), "void Point::setX(float x) noexcept\n{\n    m_x = x;\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    /// Create a new CodeBuilder with the specified indentation.
    pub fn new(indent: Indent) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Create a new CodeBuilder with 4-space indentation.
    pub fn c() -> Self {
        Self::new(Indent::C)
    }

    /// Add a line of code with current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add several lines at the current indentation.
    pub fn push_lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.push_line(line.as_ref());
        }
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Add raw text without indentation or newline.
    pub fn push_raw(&mut self, s: &str) -> &mut Self {
        self.buffer.push_str(s);
        self
    }

    /// Increase indentation level.
    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    /// Decrease indentation level.
    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a function definition with the opening brace on its own line.
    pub fn push_function(&mut self, signature: &str, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.push_line(signature);
        self.push_line("{");
        self.push_indent();
        body(self);
        self.push_dedent();
        self.push_line("}")
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level * self.indent.width() {
            self.buffer.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_line() {
        let mut builder = CodeBuilder::c();
        builder.push_line("#include <cstdint>");
        assert_eq!(builder.build(), "#include <cstdint>\n");
    }

    #[test]
    fn test_indentation() {
        let mut builder = CodeBuilder::c();
        builder
            .push_line("class Point {")
            .push_line("public:")
            .push_indent()
            .push_line("PSM_API Point() noexcept;")
            .push_dedent()
            .push_line("};");

        assert_eq!(builder.build(), "class Point {\npublic:\n    PSM_API Point() noexcept;\n};\n");
    }

    #[test]
    fn test_push_function_nests() {
        let mut builder = CodeBuilder::c();
        builder.push_function("bool Point::operator==(const Point& point) const noexcept", |b| {
            b.push_function("if (!(m_x == point.m_x))", |b| {
                b.push_line("return false;");
            });
            b.push_blank();
            b.push_line("return true;");
        });

        assert_eq!(
            builder.build(),
            "bool Point::operator==(const Point& point) const noexcept\n{\n    if (!(m_x == point.m_x))\n    {\n        return false;\n    }\n\n    return true;\n}\n"
        );
    }

    #[test]
    fn test_push_lines_and_dedent_floor() {
        let mut builder = CodeBuilder::c();
        builder.push_dedent().push_lines(["a();", "b();"]).push_raw("// end\n");
        assert_eq!(builder.build(), "a();\nb();\n// end\n");
    }
}
