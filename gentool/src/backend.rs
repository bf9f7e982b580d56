//! Backend selection shared by the CLI and `gentool.toml`.

use clap::ValueEnum;
use gentool_codegen::Backend;
use gentool_codegen_c::CBackend;
use gentool_codegen_cxx::CxxBackend;
use serde::Deserialize;

/// A selectable emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Flat C interface over the C++ classes
    C,
    /// The `psm::` C++ classes
    Cxx,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::C, BackendKind::Cxx];

    pub fn backend(self) -> Box<dyn Backend> {
        match self {
            BackendKind::C => Box::new(CBackend::new()),
            BackendKind::Cxx => Box::new(CxxBackend::new()),
        }
    }
}
