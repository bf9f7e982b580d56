use gentool_codegen::{CodeBuilder, banner, language::CXX_NAMESPACE};
use gentool_core::EntityKind;
use gentool_schema::ClassDef;

use crate::layout::ClassLayout;

/// `src/<Name>.gen.cpp`: definitions of every generated member.
pub struct ClassSource<'a> {
    def: &'a ClassDef,
    layout: &'a ClassLayout,
}

impl<'a> ClassSource<'a> {
    pub fn new(def: &'a ClassDef, layout: &'a ClassLayout) -> Self {
        Self { def, layout }
    }

    pub fn render(&self) -> String {
        let mut b = CodeBuilder::c();
        b.push_line(&banner(EntityKind::Class, self.def.name.canonical()));
        b.push_blank();
        b.push_raw(&self.layout.source_includes.render());
        b.push_blank();
        b.push_line(&format!("namespace {CXX_NAMESPACE} {{"));
        b.push_blank();
        for definition in &self.layout.definitions {
            b.push_raw(definition);
            b.push_blank();
        }
        b.push_line("}");

        if let Some((_, Some(definition))) = &self.layout.hash {
            b.push_blank();
            b.push_line("namespace std {");
            b.push_blank();
            b.push_raw(definition);
            b.push_blank();
            b.push_line("}");
        }
        b.build()
    }
}
