use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written
    Written,
    /// File already held identical content and was left untouched
    Unchanged,
}

/// A generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,
    content: String,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Whether the file on disk already holds exactly this content.
    pub fn is_up_to_date(&self) -> bool {
        std::fs::read(&self.path).is_ok_and(|existing| existing == self.content.as_bytes())
    }

    /// Write the file unless its content is byte-identical on disk, so that
    /// build systems watching the output do not see spurious changes.
    pub fn write(&self) -> Result<WriteResult> {
        if self.is_up_to_date() {
            return Ok(WriteResult::Unchanged);
        }
        write_file(&self.path, &self.content)?;
        Ok(WriteResult::Written)
    }

    /// Rebase the file path under `root`.
    pub fn under(self, root: &Path) -> Self {
        Self {
            path: root.join(self.path),
            content: self.content,
        }
    }
}
