use gentool_codegen::{CodeBuilder, banner, language::CXX_NAMESPACE};
use gentool_core::{EntityKind, Language};
use gentool_schema::{ClassDef, Visibility};

use crate::layout::ClassLayout;

/// `include/Posemesh/<Name>.hpp`.
pub struct ClassHeader<'a> {
    def: &'a ClassDef,
    layout: &'a ClassLayout,
}

impl<'a> ClassHeader<'a> {
    pub fn new(def: &'a ClassDef, layout: &'a ClassLayout) -> Self {
        Self { def, layout }
    }

    fn push_sections(&self, b: &mut CodeBuilder) {
        let mut first = true;
        for (visibility, label) in [
            (Visibility::Public, "public:"),
            (Visibility::Protected, "protected:"),
            (Visibility::Private, "private:"),
        ] {
            let groups = self.layout.section(visibility);
            if groups.is_empty() {
                continue;
            }
            if !first {
                b.push_blank();
            }
            first = false;
            b.push_line(label);
            for (index, group) in groups.iter().enumerate() {
                if index > 0 {
                    b.push_blank();
                }
                b.push_indent();
                b.push_lines(group.iter().map(|m| m.declaration.as_str()));
                b.push_dedent();
            }
        }
    }

    pub fn render(&self) -> String {
        let def = self.def;
        let guard = format!("__POSEMESH_{}_HPP__", def.header_guard.value());
        let class = def.name.lang(Language::Cxx);
        let finality = if def.is_final.get() { " final" } else { "" };

        let mut b = CodeBuilder::c();
        b.push_line(&banner(EntityKind::Class, def.name.canonical()));
        b.push_blank();
        b.push_line(&format!("#ifndef {guard}"));
        b.push_line(&format!("#define {guard}"));
        b.push_blank();
        b.push_raw(&self.layout.header_includes.render());
        b.push_blank();
        b.push_line(&format!("namespace {CXX_NAMESPACE} {{"));
        b.push_blank();

        b.push_line(&format!("class {class}{finality} {{"));
        self.push_sections(&mut b);
        b.push_line("};");
        for alias in def.aliases.iter() {
            b.push_line(&format!("using {} = {class};", alias.lang(Language::Cxx)));
        }
        if !self.layout.free_declarations.is_empty() {
            b.push_blank();
            b.push_lines(&self.layout.free_declarations);
        }
        b.push_blank();
        b.push_line("}");

        if let Some((declaration, _)) = &self.layout.hash {
            b.push_blank();
            b.push_line("namespace std {");
            b.push_blank();
            b.push_line("template <>");
            b.push_line(&format!("struct hash<{CXX_NAMESPACE}::{class}> {{"));
            b.push_line(&format!("    {declaration}"));
            b.push_line("};");
            b.push_blank();
            b.push_line("}");
        }

        b.push_blank();
        b.push_line(&format!("#endif // {guard}"));
        b.build()
    }
}
