use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use mockgen_ir::DescriptorSet;

use super::{ConfigArgs, UnwrapOrExit};
use crate::ops;

#[derive(Args)]
pub struct DescribeCommand {
    /// Go file or package directory declaring the interface
    pub source: PathBuf,

    /// Name of the interface or function type
    pub interface: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

impl DescribeCommand {
    pub fn run(&self) -> Result<()> {
        let config = self.config.load(&self.source);
        let iface = ops::resolve(&self.source, &self.interface, &config).unwrap_or_exit();

        let set = DescriptorSet {
            interfaces: vec![iface],
        };
        let json = serde_json::to_string_pretty(&set).wrap_err("Failed to serialize descriptor")?;
        println!("{json}");
        Ok(())
    }
}
