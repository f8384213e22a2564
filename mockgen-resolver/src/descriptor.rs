//! Interface descriptors read from JSON.

use std::{collections::HashMap, fs, path::{Path, PathBuf}};

use mockgen_core::{Error, Result};
use mockgen_ir::{DescriptorSet, InterfaceDescriptor};

use crate::InterfaceResolver;

/// Resolves interfaces from a `{"interfaces": [...]}` descriptor file.
#[derive(Debug, Default)]
pub struct DescriptorResolver {
    sets: HashMap<PathBuf, DescriptorSet>,
}

impl DescriptorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(&mut self, path: &Path) -> Result<&DescriptorSet> {
        if !self.sets.contains_key(path) {
            let content = fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
            let set: DescriptorSet = serde_json::from_str(&content).map_err(|e| {
                Error::resolution(format!(
                    "invalid descriptor file '{}': {e}",
                    path.display()
                ))
            })?;
            tracing::debug!(
                path = %path.display(),
                interfaces = set.interfaces.len(),
                "loaded descriptor file"
            );
            self.sets.insert(path.to_path_buf(), set);
        }
        self.sets
            .get(path)
            .ok_or_else(|| Error::not_found(path.display().to_string(), "descriptor cache"))
    }
}

impl InterfaceResolver for DescriptorResolver {
    fn resolve(&mut self, path: &Path, name: &str) -> Result<InterfaceDescriptor> {
        self.load(path)?
            .find(name)
            .cloned()
            .ok_or_else(|| Error::not_found(name, path.display().to_string()))
    }
}
