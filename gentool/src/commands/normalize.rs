use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    config::Config,
    ops::{self, normalize::NormalizeOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct NormalizeCommand {
    /// Document to normalize; its directory name (enum/ or interface/) picks the kind
    pub file: PathBuf,

    /// Path to gentool.toml (defaults to ./gentool.toml)
    #[arg(short, long, default_value = "gentool.toml")]
    pub config: PathBuf,

    /// Directory whose documents resolve type references (overrides gentool.toml)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Mark every generated value with a `<key>.gen` entry
    #[arg(long)]
    pub provenance: bool,
}

impl NormalizeCommand {
    pub fn run(&self) -> Result<()> {
        let config = Config::open(&self.config).unwrap_or_exit();
        let report = ops::normalize(NormalizeOptions {
            file: &self.file,
            input_dir: self.input.as_deref().unwrap_or(&config.input.dir),
            provenance: self.provenance,
        })?;

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
