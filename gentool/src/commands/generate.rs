use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    backend::BackendKind,
    config::Config,
    ops::{self, generate::GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to gentool.toml (defaults to ./gentool.toml)
    #[arg(short, long, default_value = "gentool.toml")]
    pub config: PathBuf,

    /// Directory holding enum/ and interface/ (overrides gentool.toml)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output root (overrides gentool.toml)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Backend to emit, repeatable (overrides gentool.toml)
    #[arg(short, long = "backend", value_enum)]
    pub backends: Vec<BackendKind>,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl Default for GenerateCommand {
    fn default() -> Self {
        Self {
            config: PathBuf::from("gentool.toml"),
            input: None,
            output: None,
            backends: Vec::new(),
            dry_run: false,
        }
    }
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let config = Config::open(&self.config).unwrap_or_exit();
        let backends = if self.backends.is_empty() {
            &config.generate.backends
        } else {
            &self.backends
        };

        let report = ops::generate(GenerateOptions {
            input_dir: self.input.as_deref().unwrap_or(&config.input.dir),
            output_dir: self.output.as_deref().unwrap_or(&config.output.dir),
            backends,
            dry_run: self.dry_run,
        })?;

        report.render(&mut TerminalOutput::new());
        if !report.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }
}
