use std::path::PathBuf;

use clap::Args;
use eyre::Result;

use super::{ConfigArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct UpdateCommand {
    /// Go file or package directory declaring the interface
    pub source: PathBuf,

    /// Name of the mocked interface or function type
    pub interface: String,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print the merged mock instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl UpdateCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.config.load(&self.source);

        let report = ops::update(ops::update::UpdateOptions {
            source: &self.source,
            interface: &self.interface,
            config: &config,
            dry_run: self.dry_run,
        })
        .unwrap_or_exit();

        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
