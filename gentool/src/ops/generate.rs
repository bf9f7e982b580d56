//! Generate operation - normalize every document, then emit.

use std::path::Path;

use eyre::{Result, WrapErr, eyre};
use gentool_codegen::Backend;
use gentool_core::{File, WriteResult};
use gentool_schema::Registry;

use super::documents::{self, Normalized};
use crate::{
    backend::BackendKind,
    reports::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult},
};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Directory holding `enum/` and `interface/`.
    pub input_dir: &'a Path,
    /// Root the backend paths are resolved against.
    pub output_dir: &'a Path,
    pub backends: &'a [BackendKind],
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Every file `backends` emit for one entity.
fn emit(name: &str, registry: &Registry, backends: &[Box<dyn Backend>]) -> Result<Vec<File>> {
    let mut files = Vec::new();
    for backend in backends {
        let entity = registry
            .get(name)
            .ok_or_else(|| eyre!("'{name}' was not normalized"))?;
        let emitted = backend
            .files(entity, registry)
            .wrap_err_with(|| format!("the {} backend failed", backend.key()))?;
        files.extend(emitted);
    }
    Ok(files)
}

/// Execute the generate operation.
///
/// A failing document is reported and skipped; the others still generate.
pub fn generate(opts: GenerateOptions<'_>) -> Result<GenerateReport> {
    let documents = documents::scan(opts.input_dir)?;
    let Normalized {
        mut reports,
        registry,
        names,
    } = documents::normalize_all(&documents);

    let mut kinds: Vec<BackendKind> = Vec::new();
    for kind in opts.backends {
        if !kinds.contains(kind) {
            kinds.push(*kind);
        }
    }
    let backends: Vec<Box<dyn Backend>> = kinds.into_iter().map(BackendKind::backend).collect();

    let mut written = WrittenResult {
        output_dir: opts.output_dir.to_path_buf(),
        ..WrittenResult::default()
    };
    let mut preview = PreviewResult::default();

    for (report, name) in reports.iter_mut().zip(&names) {
        let Some(name) = name else {
            continue;
        };
        let files = match emit(name, &registry, &backends) {
            Ok(files) => files,
            Err(error) => {
                report.fail(format!("{error:#}"));
                continue;
            }
        };

        for file in files {
            if opts.dry_run {
                preview.files.push(PreviewFile {
                    path: file.path().display().to_string(),
                    content: file.content().to_string(),
                });
                continue;
            }
            let file = file.under(opts.output_dir);
            match file.write() {
                Ok(WriteResult::Written) => written.written.push(file.path().to_path_buf()),
                Ok(WriteResult::Unchanged) => written.unchanged.push(file.path().to_path_buf()),
                Err(error) => {
                    report.fail(format!("{error:#}"));
                    break;
                }
            }
        }
    }

    let result = if opts.dry_run {
        GenerationResult::Preview(preview)
    } else {
        GenerationResult::Written(written)
    };
    Ok(GenerateReport {
        documents: reports,
        result,
    })
}
