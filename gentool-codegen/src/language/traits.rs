//! Backend abstraction.

use std::path::PathBuf;

use eyre::Result;
use gentool_core::{File, Language};
use gentool_schema::{ClassDef, EnumDef, Entity, Name, Registry};

use crate::generation::Emitted;

/// A target language emitter.
///
/// Implement this trait to add another header/source pair per entity.
/// Emission never touches the file system; [`files`](Backend::files)
/// only pairs the text with relative paths.
pub trait Backend {
    fn language(&self) -> Language;

    /// Identifier used by configuration and the command line (e.g. "c", "cxx")
    fn key(&self) -> &'static str;

    /// Header path relative to the output root
    fn header_path(&self, name: &Name) -> PathBuf;

    /// Source path relative to the output root
    fn source_path(&self, name: &Name) -> PathBuf;

    fn emit_enum(&self, def: &EnumDef, registry: &Registry) -> Result<Emitted>;

    fn emit_class(&self, def: &ClassDef, registry: &Registry) -> Result<Emitted>;

    fn emit(&self, entity: Entity<'_>, registry: &Registry) -> Result<Emitted> {
        match entity {
            Entity::Enum(def) => self.emit_enum(def, registry),
            Entity::Class(def) => self.emit_class(def, registry),
        }
    }

    /// Emit an entity and pair the output with its paths.
    fn files(&self, entity: Entity<'_>, registry: &Registry) -> Result<Vec<File>> {
        let name = entity.name().clone();
        let emitted = self.emit(entity, registry)?;
        Ok(emitted.into_files(self.header_path(&name), self.source_path(&name)))
    }
}
