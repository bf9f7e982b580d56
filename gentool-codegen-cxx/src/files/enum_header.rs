use gentool_codegen::{CodeBuilder, banner, language::CXX_NAMESPACE};
use gentool_core::{EntityKind, Language};
use gentool_schema::EnumDef;

/// `include/Posemesh/<Name>.hpp` for an enum.
pub struct EnumHeader<'a> {
    def: &'a EnumDef,
}

impl<'a> EnumHeader<'a> {
    pub fn new(def: &'a EnumDef) -> Self {
        Self { def }
    }

    pub fn render(&self) -> String {
        let def = self.def;
        let guard = format!("__POSEMESH_{}_HPP__", def.header_guard.value());
        let name = def.name.lang(Language::Cxx);
        let (underlying, suffix) = if def.is_flag() {
            ("std::uint32_t", "u")
        } else {
            ("std::int32_t", "")
        };

        let mut b = CodeBuilder::c();
        b.push_line(&banner(EntityKind::Enum, def.name.canonical()));
        b.push_blank();
        b.push_line(&format!("#ifndef {guard}"));
        b.push_line(&format!("#define {guard}"));
        b.push_blank();
        b.push_line("#include <cstdint>");
        b.push_blank();
        b.push_line(&format!("namespace {CXX_NAMESPACE} {{"));
        b.push_blank();

        if def.constants.is_empty() {
            b.push_line(&format!("enum class {name} : {underlying} {{ _ }};"));
        } else {
            b.push_line(&format!("enum class {name} : {underlying} {{"));
            let last = def.constants.len() - 1;
            for (index, constant) in def.constants.iter().enumerate() {
                let separator = if index == last { "" } else { "," };
                b.push_line(&format!(
                    "    {} = {}{suffix}{separator}",
                    constant.name.lang(Language::Cxx),
                    constant.value.get()
                ));
            }
            b.push_line("};");
        }
        for alias in def.aliases.iter() {
            b.push_line(&format!("using {} = {name};", alias.lang(Language::Cxx)));
        }

        b.push_blank();
        b.push_line("}");
        b.push_blank();
        b.push_line(&format!("#endif // {guard}"));
        b.build()
    }
}
