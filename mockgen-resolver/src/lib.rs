//! Type resolution for mockgen.
//!
//! A resolver turns a source location and a type name into the
//! [`InterfaceDescriptor`] the generator works from. Go sources are read
//! by [`GoResolver`]; `.json` descriptor files by [`DescriptorResolver`].

use std::path::Path;

use mockgen_core::{Config, Result};
use mockgen_ir::InterfaceDescriptor;

mod descriptor;
pub mod go;

pub use descriptor::DescriptorResolver;
pub use go::{GoResolver, SearchPaths};

/// Looks up the interface or function type `name` declared at `path`.
pub trait InterfaceResolver {
    fn resolve(&mut self, path: &Path, name: &str) -> Result<InterfaceDescriptor>;
}

/// The resolver for `path`: descriptor files by their `.json` extension,
/// Go sources otherwise.
pub fn resolver_for(path: &Path, config: &Config) -> Box<dyn InterfaceResolver> {
    if path.extension().is_some_and(|ext| ext == "json") {
        Box::new(DescriptorResolver::new())
    } else {
        Box::new(GoResolver::from_config(config))
    }
}
