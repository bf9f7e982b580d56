use std::path::PathBuf;

use eyre::{Result, WrapErr};
use gentool_codegen::{Backend, Emitted};
use gentool_core::Language;
use gentool_schema::{ClassDef, EnumDef, Name, Registry};

use crate::{
    files::{ClassHeader, ClassSource, EnumHeader},
    surface::Surface,
};

/// Emits the flat C interface over the generated C++ classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CBackend;

impl CBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for CBackend {
    fn language(&self) -> Language {
        Language::C
    }

    fn key(&self) -> &'static str {
        "c"
    }

    fn header_path(&self, name: &Name) -> PathBuf {
        PathBuf::from("include")
            .join("Posemesh")
            .join("C")
            .join(format!("{}.h", name.lang(Language::Cxx)))
    }

    fn source_path(&self, name: &Name) -> PathBuf {
        PathBuf::from("src")
            .join("C")
            .join(format!("{}.cpp", name.lang(Language::Cxx)))
    }

    fn emit_enum(&self, def: &EnumDef, _registry: &Registry) -> Result<Emitted> {
        Ok(Emitted::header_only(EnumHeader::new(def).render()))
    }

    fn emit_class(&self, def: &ClassDef, registry: &Registry) -> Result<Emitted> {
        let surface = Surface::build(def, registry)
            .wrap_err_with(|| format!("Failed to build the C interface of '{}'", def.name.canonical()))?;
        let header = ClassHeader::new(def, registry, &surface).render()?;
        let source = ClassSource::new(def, registry, &surface).render()?;
        Ok(Emitted::with_source(header, source))
    }
}
