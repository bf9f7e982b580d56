//! Document discovery and the normalization phase every command shares.
//!
//! Normalization is two-phase: all declared names are indexed first, so a
//! type tag may reference an entity whose document sorts later.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};
use gentool_core::EntityKind;
use gentool_schema::{
    ClassDef, DocumentWriter, EnumDef, Error, Registry, TypeIndex, Warning, check_file_name, coherence_warnings,
    declared_name, normalize_class, normalize_enum, read_document, unknown_keys,
};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use serde_json::Value;

use crate::reports::DocumentReport;

/// Subdirectories of the input root and the kind of entity each holds.
const SUBDIRECTORIES: [(&str, EntityKind); 2] = [("enum", EntityKind::Enum), ("interface", EntityKind::Class)];

/// A schema document read from disk.
#[derive(Debug)]
pub struct Document {
    pub kind: EntityKind,
    pub path: PathBuf,
    pub file_name: String,
    pub content: gentool_schema::Result<Value>,
}

impl Document {
    pub fn read(path: PathBuf, kind: EntityKind) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = read_document(&path);
        Self {
            kind,
            path,
            file_name,
            content,
        }
    }

    /// Kind implied by the directory a document lives in.
    pub fn kind_of(path: &Path) -> EntityKind {
        let parent = path.parent().and_then(Path::file_name).and_then(OsStr::to_str);
        if parent == Some("enum") {
            EntityKind::Enum
        } else {
            EntityKind::Class
        }
    }

    fn stem(&self) -> &str {
        self.path.file_stem().and_then(OsStr::to_str).unwrap_or_default()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

/// Read every document under `<input>/enum/` and `<input>/interface/`,
/// enums first and each directory in file name order.
pub fn scan(input_dir: &Path) -> Result<Vec<Document>> {
    if !input_dir.is_dir() {
        eyre::bail!("input directory '{}' does not exist", input_dir.display());
    }

    let mut documents = Vec::new();
    for (subdirectory, kind) in SUBDIRECTORIES {
        let dir = input_dir.join(subdirectory);
        if !dir.is_dir() {
            continue;
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir).wrap_err_with(|| format!("failed to list '{}'", dir.display()))? {
            let path = entry
                .wrap_err_with(|| format!("failed to list '{}'", dir.display()))?
                .path();
            if path.is_file() && is_json(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        documents.extend(paths.into_iter().map(|path| Document::read(path, kind)));
    }
    Ok(documents)
}

/// Render a diagnostic with its source snippet and help text.
pub fn render_diagnostic(diagnostic: &dyn Diagnostic) -> String {
    let mut rendered = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    match handler.render_report(&mut rendered, diagnostic) {
        Ok(()) => rendered.trim_end().to_string(),
        Err(_) => diagnostic.to_string(),
    }
}

/// A normalized enum or class.
#[derive(Debug, Clone)]
pub enum NormalizedEntity {
    Enum(EnumDef),
    Class(ClassDef),
}

impl NormalizedEntity {
    pub fn name(&self) -> &str {
        match self {
            NormalizedEntity::Enum(def) => def.name.canonical(),
            NormalizedEntity::Class(def) => def.name.canonical(),
        }
    }

    /// The fully explicit document of this entity.
    pub fn document(&self, writer: &DocumentWriter) -> Value {
        match self {
            NormalizedEntity::Enum(def) => writer.enum_document(def),
            NormalizedEntity::Class(def) => writer.class_document(def),
        }
    }

    fn insert_into(self, registry: &mut Registry) {
        match self {
            NormalizedEntity::Enum(def) => registry.insert_enum(def),
            NormalizedEntity::Class(def) => registry.insert_class(def),
        }
    }
}

/// Normalize one parsed document against `index` and collect its warnings.
pub fn normalize_document(
    document: &Value,
    kind: EntityKind,
    file_stem: &str,
    index: &TypeIndex,
) -> gentool_schema::Result<(NormalizedEntity, Vec<Warning>)> {
    let entity = match kind {
        EntityKind::Enum => NormalizedEntity::Enum(normalize_enum(document)?),
        EntityKind::Class => NormalizedEntity::Class(normalize_class(document, index)?),
    };
    let name = match &entity {
        NormalizedEntity::Enum(def) => &def.name,
        NormalizedEntity::Class(def) => &def.name,
    };
    check_file_name(name, file_stem)?;

    let mut warnings = unknown_keys(document, &entity.document(&DocumentWriter::new()));
    if let NormalizedEntity::Class(def) = &entity {
        warnings.extend(coherence_warnings(def));
    }
    Ok((entity, warnings))
}

/// Declare every parsed document. Returns, per document, the error raised
/// when its name was already taken.
pub fn index(documents: &[Document]) -> (TypeIndex, Vec<Option<Box<Error>>>) {
    let mut index = TypeIndex::new();
    let conflicts = documents
        .iter()
        .map(|document| {
            let name = document.content.as_ref().ok().and_then(declared_name)?;
            let existing = index.declare(name, document.kind)?;
            let reason = match existing {
                EntityKind::Enum => "the name is already declared by an enum document",
                EntityKind::Class => "the name is already declared by an interface document",
            };
            Some(Error::invalid_field_value("name", name, reason))
        })
        .collect();
    (index, conflicts)
}

/// Outcome of the normalization phase.
#[derive(Debug, Default)]
pub struct Normalized {
    pub reports: Vec<DocumentReport>,
    pub registry: Registry,
    /// Canonical name of the entity each report produced, if any.
    pub names: Vec<Option<String>>,
}

pub fn normalize_all(documents: &[Document]) -> Normalized {
    let (index, conflicts) = index(documents);

    let mut normalized = Normalized::default();
    for (document, conflict) in documents.iter().zip(conflicts) {
        let mut report = DocumentReport::new(&document.file_name, document.kind);
        let result = match (&document.content, conflict) {
            (Err(error), _) => Err(render_diagnostic(error.as_ref())),
            (Ok(_), Some(error)) => Err(render_diagnostic(error.as_ref())),
            (Ok(value), None) => normalize_document(value, document.kind, document.stem(), &index)
                .map_err(|error| render_diagnostic(error.as_ref())),
        };

        match result {
            Ok((entity, warnings)) => {
                report.warnings = warnings.iter().map(ToString::to_string).collect();
                normalized.names.push(Some(entity.name().to_string()));
                entity.insert_into(&mut normalized.registry);
            }
            Err(diagnostic) => {
                report.fail(diagnostic);
                normalized.names.push(None);
            }
        }
        normalized.reports.push(report);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, relative: &str, document: &Value) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(document).unwrap()).unwrap();
    }

    #[test]
    fn test_scan_orders_enums_first() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "interface/point.json", &json!({ "name": "point" }));
        write(temp.path(), "enum/mode.json", &json!({ "name": "mode" }));
        write(temp.path(), "enum/access.JSON", &json!({ "name": "access" }));
        fs::write(temp.path().join("interface/notes.txt"), "not a document").unwrap();

        let documents = scan(temp.path()).unwrap();
        let names: Vec<_> = documents.iter().map(|d| (d.file_name.as_str(), d.kind)).collect();
        assert_eq!(
            names,
            [
                ("access.JSON", EntityKind::Enum),
                ("mode.json", EntityKind::Enum),
                ("point.json", EntityKind::Class),
            ]
        );
    }

    #[test]
    fn test_scan_missing_input_dir() {
        let temp = TempDir::new().unwrap();
        assert!(scan(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn test_forward_references_resolve() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "interface/anchor.json",
            &json!({ "name": "anchor", "properties": [{ "name": "target", "type": "CLASS_PTR:zone" }] }),
        );
        write(temp.path(), "interface/zone.json", &json!({ "name": "zone" }));

        let normalized = normalize_all(&scan(temp.path()).unwrap());
        assert!(normalized.reports.iter().all(|r| !r.is_failed()));
        assert_eq!(normalized.registry.len(), 2);
    }

    #[test]
    fn test_interface_named_like_an_enum_fails() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "enum/mode.json", &json!({ "name": "mode" }));
        write(temp.path(), "interface/mode.json", &json!({ "name": "mode" }));

        let normalized = normalize_all(&scan(temp.path()).unwrap());
        assert!(!normalized.reports[0].is_failed());
        assert!(normalized.reports[1].is_failed());
        assert_eq!(normalized.names, [Some("mode".to_string()), None]);
    }

    #[test]
    fn test_file_name_must_match() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "interface/pointer.json", &json!({ "name": "point" }));

        let normalized = normalize_all(&scan(temp.path()).unwrap());
        assert!(normalized.reports[0].is_failed());
        assert!(normalized.registry.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_warnings() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "interface/point.json", &json!({ "name": "point", "colour": "red" }));

        let normalized = normalize_all(&scan(temp.path()).unwrap());
        let report = &normalized.reports[0];
        assert!(!report.is_failed());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("colour"));
    }

    #[test]
    fn test_kind_of() {
        assert_eq!(Document::kind_of(Path::new("schema/enum/mode.json")), EntityKind::Enum);
        assert_eq!(Document::kind_of(Path::new("schema/interface/point.json")), EntityKind::Class);
        assert_eq!(Document::kind_of(Path::new("point.json")), EntityKind::Class);
    }
}
