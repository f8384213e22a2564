use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{ConfigArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Go file or package directory declaring the interface
    pub source: PathBuf,

    /// Name of the interface or function type to mock
    pub interface: String,

    /// Name of the generated mock struct
    pub struct_name: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the mock instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.config.load(&self.source);

        let report = ops::generate(ops::generate::GenerateOptions {
            source: &self.source,
            interface: &self.interface,
            struct_name: &self.struct_name,
            config: &config,
            dry_run: self.dry_run,
        })
        .unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
