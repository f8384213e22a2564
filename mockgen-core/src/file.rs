use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Write `content` with a single write call, creating parent directories.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io("create directory", parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| Error::io("write", path, e))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    /// File did not exist and was created
    Created,
    /// Existing file was replaced
    Replaced,
}

/// A file to be written, fully rendered in memory
pub struct File {
    path: PathBuf,
    content: String,
    rules: FileRules,
}

impl File {
    /// Create a new file with the given path and content (default rules: refuse to overwrite)
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            rules: FileRules::default(),
        }
    }

    /// Replace the writing rules
    pub fn with_rules(mut self, rules: FileRules) -> Self {
        self.rules = rules;
        self
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the file content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the file according to its rules
    pub fn write(&self) -> Result<WriteResult> {
        let existed = self.exists();
        match self.rules.overwrite {
            Overwrite::Always => {
                write_file(&self.path, &self.content)?;
            }
            Overwrite::Refuse => {
                if existed {
                    return Err(Box::new(Error::AlreadyExists {
                        path: self.path.clone(),
                    }));
                }
                write_file(&self.path, &self.content)?;
            }
        }
        Ok(if existed {
            WriteResult::Replaced
        } else {
            WriteResult::Created
        })
    }
}

/// Rules that determine how a file should be written
#[derive(Debug, Clone, Default)]
pub struct FileRules {
    pub overwrite: Overwrite,
}

impl FileRules {
    /// Rules for rewriting an existing file in place.
    pub fn replace() -> Self {
        Self {
            overwrite: Overwrite::Always,
        }
    }
}

/// How to handle existing files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overwrite {
    /// Always overwrite (merged updates)
    Always,
    /// Fail if the file already exists (fresh generation)
    #[default]
    Refuse,
}
