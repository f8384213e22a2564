//! Core utilities and types for the mockgen generator.
//!
//! This crate provides the error taxonomy, configuration and file writing
//! rules shared across the mockgen crates.

mod config;
mod error;
mod file;
mod utils;

// Configuration
pub use config::{
    CONFIG_FILE, Config, DEFAULT_MOCK_PACKAGE, FormatConfig, FormatTool, MockConfig,
    ResolveConfig,
};
// Errors
pub use error::{Error, ErrorKind, Result, SourceContext};
// File operations
pub use file::{File, FileRules, Overwrite, WriteResult};
// String utilities
pub use utils::{
    contains_word, import_path_name, is_ident_char, mock_file_name, sanitize_identifier,
};
