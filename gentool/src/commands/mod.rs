mod check;
mod completions;
mod generate;
mod normalize;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use normalize::NormalizeCommand;

/// Extension trait for exiting on configuration errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for crate::config::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "gentool")]
#[command(version)]
#[command(about = "Generate C and C++ SDK bindings from JSON interface documents")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            None => GenerateCommand::default().run(),
            Some(Commands::Generate(cmd)) => cmd.run(),
            Some(Commands::Check(cmd)) => cmd.run(),
            Some(Commands::Normalize(cmd)) => cmd.run(),
            Some(Commands::Completions(cmd)) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code for every document (the default command)
    Generate(GenerateCommand),

    /// Normalize every document without generating code
    Check(CheckCommand),

    /// Print the fully explicit form of one document
    Normalize(NormalizeCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::backend::BackendKind;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_generate() {
        let cli = Cli::try_parse_from(["gentool"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_repeated_backend_flags() {
        let cli = Cli::try_parse_from(["gentool", "generate", "-b", "c", "--backend", "cxx", "--dry-run"]).unwrap();
        let Some(Commands::Generate(cmd)) = cli.command else {
            panic!("expected the generate command");
        };
        assert_eq!(cmd.backends, [BackendKind::C, BackendKind::Cxx]);
        assert!(cmd.dry_run);
    }
}
