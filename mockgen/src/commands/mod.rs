mod completions;
mod describe;
mod generate;
mod update;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use describe::DescribeCommand;
use eyre::Result;
use generate::GenerateCommand;
use mockgen_core::{Config, Error};
use update::UpdateCommand;

use crate::ops;

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for mockgen_core::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                if let Error::Format { raw, .. } = &*e {
                    dump_unformatted(raw);
                }
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Print source the formatter rejected, so it can be inspected.
fn dump_unformatted(raw: &str) {
    eprintln!("──── unformatted source ────");
    eprint!("{raw}");
    if !raw.ends_with('\n') {
        eprintln!();
    }
    eprintln!("──── end of unformatted source ────");
}

/// Options shared by commands that read an interface.
#[derive(Args)]
pub struct ConfigArgs {
    /// Path to mockgen.toml (defaults to the nearest one next to the source)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConfigArgs {
    fn load(&self, source: &Path) -> Config {
        ops::load_config(self.config.as_deref(), source).unwrap_or_exit()
    }
}

#[derive(Parser)]
#[command(name = "mockgen")]
#[command(version)]
#[command(about = "Generate and update testify mocks for Go interfaces")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Update(cmd) => cmd.run(),
            Commands::Describe(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new mock for an interface or function type
    Generate(GenerateCommand),

    /// Regenerate an existing mock, keeping edited methods
    Update(UpdateCommand),

    /// Print the resolved interface as a JSON descriptor
    Describe(DescribeCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
