//! Locating and parsing Go packages.
//!
//! A package is every non-test `.go` file of a directory that shares the
//! package clause. Imported packages are looked up in the current module,
//! `vendor/` directories, replaced modules, the module cache, `GOROOT`
//! and the configured package roots, in that order.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use mockgen_core::{Error, Result, SourceContext};

use super::{
    ast::{SourceFile, TypeSpec},
    module::{Module, Provider, Replacement, escape_module, join_import},
    parser::parse,
};

/// A parsed package.
#[derive(Debug)]
pub struct Package {
    /// Import path.
    pub path: String,
    /// Declared package name.
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<SourceFile>,
}

impl Package {
    /// Position of the declaration of `name` as (file, type) indices.
    pub fn find_type(&self, name: &str) -> Option<(usize, usize)> {
        self.files.iter().enumerate().find_map(|(f, file)| {
            file.types
                .iter()
                .position(|spec| spec.name == name)
                .map(|t| (f, t))
        })
    }

    pub fn spec(&self, (file, index): (usize, usize)) -> &TypeSpec {
        &self.files[file].types[index]
    }
}

/// The package under resolution, with the first syntax error of a file
/// that had to be skipped.
#[derive(Debug)]
pub struct TargetPackage {
    pub package: Rc<Package>,
    pub skipped: Option<Box<Error>>,
}

/// Where packages are searched for.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    /// Directories addressed by root-relative import paths.
    pub roots: Vec<PathBuf>,
    /// Name of vendored-dependency directories.
    pub vendor: String,
    pub goroot: Option<PathBuf>,
    pub module_cache: Option<PathBuf>,
}

impl SearchPaths {
    /// Standard library and module cache locations from the environment.
    pub fn from_env(roots: Vec<PathBuf>, vendor: impl Into<String>) -> Self {
        Self {
            roots,
            vendor: vendor.into(),
            goroot: goroot(),
            module_cache: module_cache(),
        }
    }
}

fn goroot() -> Option<PathBuf> {
    if let Some(root) = std::env::var_os("GOROOT") {
        return Some(PathBuf::from(root));
    }
    ["/usr/local/go", "/usr/lib/go"]
        .into_iter()
        .map(PathBuf::from)
        .find(|dir| dir.join("src").is_dir())
}

fn module_cache() -> Option<PathBuf> {
    if let Some(cache) = std::env::var_os("GOMODCACHE") {
        return Some(PathBuf::from(cache));
    }
    if let Some(gopath) = std::env::var_os("GOPATH") {
        return std::env::split_paths(&gopath)
            .next()
            .map(|p| p.join("pkg").join("mod"));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join("go").join("pkg").join("mod"))
}

/// Loads packages relative to one directory, caching by import path.
pub struct PackageLoader {
    base: PathBuf,
    module: Option<Module>,
    search: SearchPaths,
    cache: HashMap<String, Option<Rc<Package>>>,
}

impl PackageLoader {
    /// A loader for imports made from the package in `base`.
    pub fn new(base: &Path, search: SearchPaths) -> Self {
        let module = Module::find(base);
        if let Some(module) = &module {
            tracing::debug!(module = %module.path, root = %module.root.display(), "found go.mod");
        }
        Self {
            base: base.to_path_buf(),
            module,
            search,
            cache: HashMap::new(),
        }
    }

    /// Import path of the package in `dir`: from `go.mod`, a package root,
    /// or the directory itself.
    pub fn import_path_of(&self, dir: &Path) -> String {
        if let Some(path) = self.module.as_ref().and_then(|m| m.import_path_of(dir)) {
            return path;
        }
        for root in &self.search.roots {
            if let Ok(rel) = dir.strip_prefix(root) {
                if rel.as_os_str().is_empty() {
                    continue;
                }
                let path = join_import("", rel);
                return path.trim_start_matches('/').to_string();
            }
        }
        dir.display().to_string()
    }

    /// Load the package in `dir`. A syntax error in `strict` fails the
    /// load; other unparsable files are skipped.
    pub fn load_target(&mut self, dir: &Path, strict: Option<&Path>) -> Result<TargetPackage> {
        let path = self.import_path_of(dir);
        let (package, skipped) = read_package(dir, path.clone(), strict)?;
        let package = Rc::new(package);
        self.cache.insert(path, Some(Rc::clone(&package)));
        Ok(TargetPackage { package, skipped })
    }

    /// Load an imported package, `None` when it cannot be found.
    pub fn load_import(&mut self, import_path: &str) -> Option<Rc<Package>> {
        if let Some(cached) = self.cache.get(import_path) {
            return cached.clone();
        }
        let package = self.locate(import_path).and_then(|dir| {
            match read_package(&dir, import_path.to_string(), None) {
                Ok((package, _)) if !package.files.is_empty() => {
                    tracing::debug!(path = import_path, dir = %dir.display(), "loaded package");
                    Some(Rc::new(package))
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!(path = import_path, error = %e, "failed to read package");
                    None
                }
            }
        });
        if package.is_none() {
            tracing::warn!(path = import_path, "package not found");
        }
        self.cache.insert(import_path.to_string(), package.clone());
        package
    }

    /// Candidate directories for `import_path`, first existing one wins.
    fn locate(&self, import_path: &str) -> Option<PathBuf> {
        let mut candidates = Vec::new();

        if let Some(module) = &self.module {
            candidates.extend(module.local_dir(import_path));
        }

        let stop = self.module.as_ref().map(|m| m.root.as_path());
        for dir in self.base.ancestors() {
            candidates.push(dir.join(&self.search.vendor).join(import_path));
            if Some(dir) == stop {
                break;
            }
        }

        if let Some((provider, rest)) = self.module.as_ref().and_then(|m| m.provider(import_path)) {
            match provider {
                Provider::Replaced(Replacement::Dir(dir)) => candidates.push(dir.join(rest)),
                Provider::Replaced(Replacement::Module { path, version }) => {
                    candidates.extend(self.cached_module(path, version, rest));
                }
                Provider::Required { module, version } => {
                    candidates.extend(self.cached_module(module, version, rest));
                }
            }
        }

        if let Some(goroot) = &self.search.goroot {
            candidates.push(goroot.join("src").join(import_path));
        }
        candidates.extend(self.search.roots.iter().map(|root| root.join(import_path)));

        candidates.into_iter().find(|dir| {
            tracing::trace!(dir = %dir.display(), "probing package directory");
            dir.is_dir()
        })
    }

    fn cached_module(&self, module: &str, version: &str, rest: &str) -> Option<PathBuf> {
        let cache = self.search.module_cache.as_ref()?;
        let dir = format!("{}@{}", escape_module(module), escape_module(version));
        Some(cache.join(dir).join(rest))
    }
}

/// Parse the non-test Go files of `dir`.
fn read_package(
    dir: &Path,
    path: String,
    strict: Option<&Path>,
) -> Result<(Package, Option<Box<Error>>)> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("read", dir, e))?;
    let mut sources: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_package_file(p))
        .collect();
    sources.sort();

    let mut files = Vec::new();
    let mut skipped = None;
    for source in sources {
        let content = fs::read_to_string(&source).map_err(|e| Error::io("read", &source, e))?;
        match parse(&content) {
            Ok(file) => files.push((source, file)),
            Err(e) => {
                let err = SourceContext::new(content, source.display().to_string())
                    .syntax_error(e.message, e.span);
                if strict.is_some_and(|s| same_file(s, &source)) {
                    return Err(err);
                }
                tracing::warn!(file = %source.display(), "skipping unparsable file");
                skipped.get_or_insert(err);
            }
        }
    }

    let name = strict
        .and_then(|s| files.iter().find(|(p, _)| same_file(s, p)))
        .or_else(|| files.iter().find(|(_, f)| f.package != "main"))
        .or_else(|| files.first())
        .map(|(_, f)| f.package.clone())
        .unwrap_or_default();
    let files = files
        .into_iter()
        .filter(|(p, f)| {
            let keep = f.package == name;
            if !keep {
                tracing::debug!(file = %p.display(), package = %f.package, "ignoring file of another package");
            }
            keep
        })
        .map(|(_, f)| f)
        .collect();

    Ok((
        Package {
            path,
            name,
            dir: dir.to_path_buf(),
            files,
        },
        skipped,
    ))
}

fn is_package_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go") && path.is_file()
}

fn same_file(a: &Path, b: &Path) -> bool {
    a == b || a.file_name() == b.file_name()
}
