//! `mockgen.toml` configuration.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::{Error, Result, SourceContext};

/// Name of the configuration file looked up next to the interface.
pub const CONFIG_FILE: &str = "mockgen.toml";

/// Import path of the call-recording library used by generated mocks.
pub const DEFAULT_MOCK_PACKAGE: &str = "github.com/stretchr/testify/mock";

/// Root of `mockgen.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// `[mock]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    /// Import path of the call-recording library.
    #[serde(default = "default_mock_package")]
    pub package: String,
    /// Suffix appended to the interface's package name for the mock package.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            package: default_mock_package(),
            suffix: default_suffix(),
        }
    }
}

fn default_mock_package() -> String {
    DEFAULT_MOCK_PACKAGE.to_string()
}

fn default_suffix() -> String {
    "mock".to_string()
}

/// Which formatter runs over generated sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTool {
    /// In-process validation and import organization.
    #[default]
    Builtin,
    /// Pipe through an external `gofmt`-compatible command.
    Gofmt,
}

/// `[format]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default)]
    pub tool: FormatTool,
    /// Executable used when `tool = "gofmt"`.
    #[serde(default = "default_format_command")]
    pub command: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            tool: FormatTool::default(),
            command: default_format_command(),
        }
    }
}

fn default_format_command() -> String {
    "gofmt".to_string()
}

/// `[resolve]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveConfig {
    /// Directories whose contents are addressed by root-relative import paths.
    #[serde(default)]
    pub roots: Vec<PathBuf>,
    /// Directory name marking vendored copies of dependencies.
    #[serde(default = "default_vendor")]
    pub vendor: String,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            vendor: default_vendor(),
        }
    }
}

fn default_vendor() -> String {
    "vendor".to_string()
}

impl Config {
    /// Parse configuration, attributing errors to `filename`.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SourceContext::new(content, filename).config_error(e))
    }

    /// Open and parse a configuration file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io("read", path, e))?;
        let config = Self::from_str_with_filename(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Find the nearest `mockgen.toml` in `start` or its ancestors.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// Load the nearest configuration, or defaults when there is none.
    pub fn load_for(start: &Path) -> Result<Self> {
        match Self::discover(start) {
            Some(path) => Self::open(path),
            None => Ok(Self::default()),
        }
    }

    /// Package roots: configured ones first, then `$GOPATH/src` entries.
    pub fn package_roots(&self) -> Vec<PathBuf> {
        let mut roots = self.resolve.roots.clone();
        if let Some(gopath) = std::env::var_os("GOPATH") {
            roots.extend(std::env::split_paths(&gopath).map(|p| p.join("src")));
        }
        roots
    }
}

impl FromStr for Config {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, CONFIG_FILE)
    }
}
