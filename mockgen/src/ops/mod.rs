//! Core operations.
//!
//! This module contains the business logic for mockgen commands,
//! separated from CLI argument parsing and output rendering.

pub mod discover;
pub mod generate;
pub mod update;

use std::path::Path;

use mockgen_core::{Config, Result};
use mockgen_ir::InterfaceDescriptor;
use mockgen_resolver::resolver_for;

pub use generate::generate;
pub use update::update;

/// Configuration from `explicit` when given, otherwise the nearest
/// `mockgen.toml` at or above the source.
pub fn load_config(explicit: Option<&Path>, source: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::open(path),
        None => Config::load_for(source_dir(source)),
    }
}

/// Directory the interface is declared in; mock directories are created
/// next to it.
pub fn source_dir(source: &Path) -> &Path {
    if source.is_dir() {
        return source;
    }
    source
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Resolve `name` with the resolver matching the source kind.
pub fn resolve(source: &Path, name: &str, config: &Config) -> Result<InterfaceDescriptor> {
    resolver_for(source, config).resolve(source, name)
}
