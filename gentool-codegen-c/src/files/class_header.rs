use eyre::Result;
use gentool_codegen::{
    CodeBuilder, IncludeCollector, banner,
    language::{CXX_NAMESPACE, c_ref_type, c_stem},
};
use gentool_core::{EntityKind, Language};
use gentool_schema::{ClassDef, Registry};

use crate::surface::Surface;

/// `include/Posemesh/C/<Name>.h` for a class.
pub struct ClassHeader<'a> {
    def: &'a ClassDef,
    registry: &'a Registry,
    surface: &'a Surface,
}

impl<'a> ClassHeader<'a> {
    pub fn new(def: &'a ClassDef, registry: &'a Registry, surface: &'a Surface) -> Self {
        Self { def, registry, surface }
    }

    fn includes(&self) -> Result<IncludeCollector> {
        let mut includes = IncludeCollector::new();
        let declarations: Vec<String> = self.surface.functions().map(|f| f.declaration()).collect();
        if declarations.iter().any(|d| d.contains("size_t")) {
            includes.system("stddef.h");
        }
        if declarations.iter().any(|d| d.contains("int8_t") || d.contains("int16_t") || d.contains("int32_t") || d.contains("int64_t")) {
            includes.system("stdint.h");
        }
        includes.local("API.h");
        for name in &self.surface.referenced {
            let entity = self
                .registry
                .get(name)
                .ok_or_else(|| eyre::eyre!("'{name}' is referenced but was not normalized"))?;
            includes.local(&format!("{}.h", entity.name().lang(Language::Cxx)));
        }
        Ok(includes)
    }

    pub fn render(&self) -> Result<String> {
        let def = self.def;
        let guard = format!("__POSEMESH_C_{}_H__", def.header_guard.value());
        let stem = c_stem(&def.name);
        let handle = def.name.lang(Language::C);
        let ref_type = c_ref_type(&def.name);
        let with_references = self.surface.has_references();

        let mut b = CodeBuilder::c();
        b.push_line(&banner(EntityKind::Class, def.name.canonical()));
        b.push_blank();
        b.push_line(&format!("#ifndef {guard}"));
        b.push_line(&format!("#define {guard}"));
        b.push_blank();
        b.push_raw(&self.includes()?.render());
        b.push_blank();

        b.push_line("#if defined(__cplusplus)");
        if with_references {
            b.push_line("#include <memory>");
            b.push_blank();
        }
        b.push_line(&format!("namespace {CXX_NAMESPACE} {{"));
        b.push_line(&format!("class {};", def.name.lang(Language::Cxx)));
        b.push_line("}");
        b.push_line(&format!("typedef {CXX_NAMESPACE}::{} {handle};", def.name.lang(Language::Cxx)));
        if with_references {
            b.push_line(&format!("typedef std::shared_ptr<{handle}> {ref_type};"));
        }
        b.push_line("#else");
        b.push_line(&format!("typedef struct {stem} {handle};"));
        if with_references {
            b.push_line(&format!("typedef struct {stem}_ref {ref_type};"));
        }
        b.push_line("#endif");

        if !def.aliases.is_empty() {
            b.push_blank();
            for alias in def.aliases.iter() {
                b.push_line(&format!("typedef {handle} {};", alias.lang(Language::C)));
                if with_references {
                    b.push_line(&format!("typedef {ref_type} {};", c_ref_type(alias)));
                }
            }
        }

        b.push_blank();
        b.push_line("#if defined(__cplusplus)");
        b.push_line("extern \"C\" {");
        b.push_line("#endif");
        for group in self.surface.groups() {
            b.push_blank();
            for function in group {
                b.push_line(&function.declaration());
            }
        }
        b.push_blank();
        b.push_line("#if defined(__cplusplus)");
        b.push_line("}");
        b.push_line("#endif");

        if def.c_generate_func_alias_defines.get() && !def.aliases.is_empty() {
            b.push_blank();
            for alias in def.aliases.iter() {
                let alias_stem = c_stem(alias);
                for function in self.surface.functions() {
                    let Some(rest) = function.name.strip_prefix(stem) else {
                        continue;
                    };
                    let args = function.arg_names();
                    b.push_line(&format!("#define {alias_stem}{rest}({args}) {}({args})", function.name));
                }
            }
        }

        b.push_blank();
        b.push_line(&format!("#endif // {guard}"));
        Ok(b.build())
    }
}
