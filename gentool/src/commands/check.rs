use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    config::Config,
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to gentool.toml (defaults to ./gentool.toml)
    #[arg(short, long, default_value = "gentool.toml")]
    pub config: PathBuf,

    /// Directory holding enum/ and interface/ (overrides gentool.toml)
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let config = Config::open(&self.config).unwrap_or_exit();
        let report = ops::check(self.input.as_deref().unwrap_or(&config.input.dir))?;

        report.render(&mut TerminalOutput::new());
        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
