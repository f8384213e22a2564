//! Import collection utilities.

use indexmap::IndexMap;

/// One import: a path and the alias it is referenced by, when that alias
/// differs from the last path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub path: String,
    pub alias: Option<String>,
}

impl ImportSpec {
    /// Create a spec for `path` referenced as `name`.
    pub fn new(path: impl Into<String>, name: &str) -> Self {
        let path = path.into();
        let alias = (last_segment(&path) != name).then(|| name.to_string());
        Self { path, alias }
    }

    /// Name the import is referenced by in source.
    pub fn name(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| last_segment(&self.path))
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Tracks imports and deduplicates them.
///
/// Maintains insertion order; [`ImportCollector::groups`] produces the
/// sorted layout used when printing.
///
/// # Example
///
/// ```
/// use mockgen_codegen::generation::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("github.com/stretchr/testify/mock", "mock");
/// imports.add("context", "context");
///
/// let groups = imports.groups(|path| !path.contains('.'));
/// assert_eq!(groups[0][0].path, "context");
/// assert_eq!(groups[1][0].path, "github.com/stretchr/testify/mock");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    /// Path -> spec
    imports: IndexMap<String, ImportSpec>,
}

impl ImportCollector {
    /// Create a new empty import collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import of `path` referenced as `name`. The first name wins.
    pub fn add(&mut self, path: &str, name: &str) {
        self.imports
            .entry(path.to_string())
            .or_insert_with(|| ImportSpec::new(path, name));
    }

    /// Add a pre-built spec. The first spec for a path wins.
    pub fn add_spec(&mut self, spec: ImportSpec) {
        self.imports.entry(spec.path.clone()).or_insert(spec);
    }

    /// Iterate over all imports in insertion order.
    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &ImportSpec> {
        self.imports.values()
    }

    /// Split into two groups, the first holding paths accepted by
    /// `first_group`; each group sorted by path, empty groups dropped.
    pub fn groups(&self, first_group: impl Fn(&str) -> bool) -> Vec<Vec<ImportSpec>> {
        let (mut first, mut rest): (Vec<_>, Vec<_>) = self
            .imports
            .values()
            .cloned()
            .partition(|spec| first_group(&spec.path));
        first.sort_by(|a, b| a.path.cmp(&b.path));
        rest.sort_by(|a, b| a.path.cmp(&b.path));
        [first, rest].into_iter().filter(|g| !g.is_empty()).collect()
    }

    /// Check if the collector is empty.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}
