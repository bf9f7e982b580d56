use eyre::Result;
use gentool_codegen::{CodeBuilder, IncludeCollector, banner};
use gentool_core::{EntityKind, Language};
use gentool_schema::{ClassDef, Registry};

use crate::surface::Surface;

/// `src/C/<Name>.cpp`: each exported function forwards to the C++ class.
pub struct ClassSource<'a> {
    def: &'a ClassDef,
    registry: &'a Registry,
    surface: &'a Surface,
}

impl<'a> ClassSource<'a> {
    pub fn new(def: &'a ClassDef, registry: &'a Registry, surface: &'a Surface) -> Self {
        Self { def, registry, surface }
    }

    fn includes(&self) -> Result<IncludeCollector> {
        let cxx = self.def.name.lang(Language::Cxx);
        let mut includes = IncludeCollector::new();
        includes.system(&format!("Posemesh/C/{cxx}.h"));
        includes.system(&format!("Posemesh/{cxx}.hpp"));
        includes.system("cassert");
        includes.system("new");
        if self.surface.uses_strings {
            includes.system("cstring");
            includes.system("string");
        }
        for name in &self.surface.referenced {
            let entity = self
                .registry
                .get(name)
                .ok_or_else(|| eyre::eyre!("'{name}' is referenced but was not normalized"))?;
            if entity.kind() == EntityKind::Class {
                includes.system(&format!("Posemesh/{}.hpp", entity.name().lang(Language::Cxx)));
            }
        }
        Ok(includes)
    }

    pub fn render(&self) -> Result<String> {
        let mut b = CodeBuilder::c();
        b.push_line(&banner(EntityKind::Class, self.def.name.canonical()));
        b.push_blank();
        b.push_raw(&self.includes()?.render());

        for function in self.surface.functions() {
            b.push_blank();
            b.push_function(&function.signature(), |b| {
                b.push_lines(&function.body);
            });
        }
        Ok(b.build())
    }
}
