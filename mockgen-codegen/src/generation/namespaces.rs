//! Namespace alias bindings.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use mockgen_core::sanitize_identifier;

/// Bijective mapping between namespace paths and local aliases.
///
/// Bindings only grow: once a path has an alias it keeps it for the
/// lifetime of the value, and no alias is ever handed to a second path.
///
/// # Example
///
/// ```
/// use mockgen_codegen::generation::NamespaceBindings;
///
/// let mut bindings = NamespaceBindings::new();
/// let a = bindings.bind("github.com/acme/api/model", "model");
/// let b = bindings.bind("github.com/acme/db/model", "model");
///
/// assert_eq!(a, "model");
/// assert_eq!(b, "dbmodel");
/// assert_eq!(bindings.bind("github.com/acme/api/model", "other"), "model");
/// ```
#[derive(Debug, Clone)]
pub struct NamespaceBindings {
    /// Localized path -> alias
    by_path: IndexMap<String, String>,
    /// Alias -> localized path
    by_alias: IndexMap<String, String>,
    /// Raw path -> localized path
    localized: HashMap<String, String>,
    roots: Vec<PathBuf>,
    vendor: String,
}

impl Default for NamespaceBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceBindings {
    /// Create empty bindings with the default `vendor` marker and no package roots.
    pub fn new() -> Self {
        Self {
            by_path: IndexMap::new(),
            by_alias: IndexMap::new(),
            localized: HashMap::new(),
            roots: Vec::new(),
            vendor: "vendor".to_string(),
        }
    }

    /// Set the directories absolute paths are made relative to.
    pub fn with_roots(mut self, roots: impl IntoIterator<Item = PathBuf>) -> Self {
        self.roots = roots.into_iter().collect();
        self
    }

    /// Set the directory name that marks vendored dependencies.
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    /// Bind `path` and return its alias.
    ///
    /// Repeated calls for the same path return the first alias. A new path
    /// gets `suggested` when it is free, else the shortest free concatenation
    /// of its trailing segments, else `suggested` followed by a counter
    /// starting at 2.
    pub fn bind(&mut self, path: &str, suggested: &str) -> String {
        let path = self.localize(path);
        if let Some(existing) = self.by_path.get(&path) {
            return existing.clone();
        }

        let alias = self.non_conflicting_alias(&path, suggested);
        tracing::debug!(%path, %alias, "bound namespace");
        self.by_path.insert(path.clone(), alias.clone());
        self.by_alias.insert(alias.clone(), path);
        alias
    }

    fn non_conflicting_alias(&self, path: &str, suggested: &str) -> String {
        if !suggested.is_empty() && !self.contains_alias(suggested) {
            return suggested.to_string();
        }

        let segments: Vec<String> = path.split('/').map(sanitize_identifier).collect();
        for start in (0..segments.len()).rev() {
            let candidate = segments[start..].concat();
            if !candidate.is_empty() && !self.contains_alias(&candidate) {
                return candidate;
            }
        }

        (2..)
            .map(|n| format!("{suggested}{n}"))
            .find(|candidate| !self.contains_alias(candidate))
            .unwrap_or_default()
    }

    /// Reduce `path` to the import path used as binding key.
    ///
    /// A `.go` file path becomes its directory, everything up to and
    /// including the last vendor marker is dropped, an absolute path under a
    /// package root becomes root-relative, and separators become `/`.
    pub fn localize(&mut self, path: &str) -> String {
        let path = match path.strip_suffix(".go") {
            Some(_) => path
                .rfind(['/', '\\'])
                .map_or("", |at| &path[..at]),
            None => path,
        };
        if let Some(cached) = self.localized.get(path) {
            return cached.clone();
        }

        let segments: Vec<&str> = path.split(['/', '\\']).collect();
        let localized = match segments.iter().rposition(|s| *s == self.vendor) {
            Some(at) => segments[at + 1..].join("/"),
            None if is_absolute(path) => self
                .relative_to_root(Path::new(path))
                .unwrap_or_else(|| segments.join("/")),
            None => segments.join("/"),
        };

        tracing::trace!(%path, %localized, "localized namespace path");
        self.localized.insert(path.to_string(), localized.clone());
        localized
    }

    fn relative_to_root(&self, path: &Path) -> Option<String> {
        self.roots.iter().find_map(|root| {
            let rel = path.strip_prefix(root).ok()?;
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(parts.join("/"))
        })
    }

    /// Alias bound to a (localized) path. Inspection only: rendering goes
    /// through [`NamespaceBindings::bind`].
    pub fn alias_of(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    /// Whether an alias is taken.
    pub fn contains_alias(&self, alias: &str) -> bool {
        self.by_alias.contains_key(alias)
    }
}

/// Bijection inspection for tests.
#[cfg(test)]
impl NamespaceBindings {
    fn path_of(&self, alias: &str) -> Option<&str> {
        self.by_alias.get(alias).map(String::as_str)
    }

    /// `(alias, path)` pairs sorted by alias.
    fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<_> = self
            .by_alias
            .iter()
            .map(|(alias, path)| (alias.as_str(), path.as_str()))
            .collect();
        pairs.sort_by_key(|(alias, _)| *alias);
        pairs
    }

    fn len(&self) -> usize {
        self.by_path.len()
    }
}

fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() > 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}
