use std::path::PathBuf;

use eyre::{Result, WrapErr};
use gentool_codegen::{Backend, Emitted};
use gentool_core::Language;
use gentool_schema::{ClassDef, EnumDef, Name, Registry};

use crate::{
    files::{ClassHeader, ClassSource, EnumHeader},
    layout::ClassLayout,
};

/// Emits the `psm::` C++ classes the other bindings wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct CxxBackend;

impl CxxBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for CxxBackend {
    fn language(&self) -> Language {
        Language::Cxx
    }

    fn key(&self) -> &'static str {
        "cxx"
    }

    fn header_path(&self, name: &Name) -> PathBuf {
        PathBuf::from("include")
            .join("Posemesh")
            .join(format!("{}.hpp", name.lang(Language::Cxx)))
    }

    fn source_path(&self, name: &Name) -> PathBuf {
        PathBuf::from("src").join(format!("{}.gen.cpp", name.lang(Language::Cxx)))
    }

    fn emit_enum(&self, def: &EnumDef, _registry: &Registry) -> Result<Emitted> {
        Ok(Emitted::header_only(EnumHeader::new(def).render()))
    }

    fn emit_class(&self, def: &ClassDef, registry: &Registry) -> Result<Emitted> {
        let layout = ClassLayout::build(def, registry)
            .wrap_err_with(|| format!("Failed to lay out the C++ class '{}'", def.name.canonical()))?;
        let header = ClassHeader::new(def, &layout).render();
        let source = ClassSource::new(def, &layout).render();
        Ok(Emitted::with_source(header, source))
    }
}
