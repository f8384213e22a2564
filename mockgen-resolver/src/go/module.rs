//! `go.mod` reading and import path layout.

use std::path::{Path, PathBuf};

/// Target of a `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// `=> ../local/dir`
    Dir(PathBuf),
    /// `=> other/module v1.2.3`
    Module { path: String, version: String },
}

/// A module read from `go.mod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// `module` path.
    pub path: String,
    /// Directory holding `go.mod`.
    pub root: PathBuf,
    /// `require`d module paths and versions.
    pub requires: Vec<(String, String)>,
    /// `replace`d module paths.
    pub replaces: Vec<(String, Replacement)>,
}

impl Module {
    /// The module owning `dir`: the nearest `go.mod` in it or a parent.
    pub fn find(dir: &Path) -> Option<Self> {
        dir.ancestors().find_map(|candidate| {
            let go_mod = candidate.join("go.mod");
            let content = std::fs::read_to_string(&go_mod).ok()?;
            let module = Self::parse(candidate, &content);
            if module.is_none() {
                tracing::warn!(path = %go_mod.display(), "go.mod has no module directive");
            }
            module
        })
    }

    /// Parse `go.mod` content; `None` without a `module` directive.
    pub fn parse(root: &Path, content: &str) -> Option<Self> {
        let mut path = None;
        let mut requires = Vec::new();
        let mut replaces = Vec::new();
        let mut block: Option<&str> = None;

        for line in content.lines() {
            let line = line.split("//").next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            if block.is_some() && line == ")" {
                block = None;
                continue;
            }
            let (directive, rest) = match block {
                Some(directive) => (directive, line),
                None => {
                    let (directive, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                    let rest = rest.trim();
                    if rest == "(" {
                        block = Some(directive);
                        continue;
                    }
                    (directive, rest)
                }
            };
            match directive {
                "module" => path = Some(unquote(rest).to_string()),
                "require" => {
                    let mut fields = rest.split_whitespace();
                    if let (Some(module), Some(version)) = (fields.next(), fields.next()) {
                        requires.push((unquote(module).to_string(), version.to_string()));
                    }
                }
                "replace" => {
                    if let Some(replace) = parse_replace(root, rest) {
                        replaces.push(replace);
                    }
                }
                _ => {}
            }
        }

        Some(Self {
            path: path?,
            root: root.to_path_buf(),
            requires,
            replaces,
        })
    }

    /// Import path of the package in `dir`, if it lies inside the module.
    pub fn import_path_of(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).ok()?;
        Some(join_import(&self.path, rel))
    }

    /// Directory of the module-local package `import_path`.
    pub fn local_dir(&self, import_path: &str) -> Option<PathBuf> {
        let rest = strip_module(import_path, &self.path)?;
        Some(self.root.join(rest))
    }

    /// The required or replaced module providing `import_path`, longest
    /// module path first, with the package's path inside it.
    pub fn provider<'a>(&'a self, import_path: &'a str) -> Option<(Provider<'a>, &'a str)> {
        let replaced = self
            .replaces
            .iter()
            .filter_map(|(module, target)| Some((module.as_str(), strip_module(import_path, module)?, target)))
            .max_by_key(|(module, ..)| module.len());
        if let Some((_, rest, target)) = replaced {
            return Some((Provider::Replaced(target), rest));
        }

        self.requires
            .iter()
            .filter_map(|(module, version)| {
                Some((module.as_str(), version.as_str(), strip_module(import_path, module)?))
            })
            .max_by_key(|(module, ..)| module.len())
            .map(|(module, version, rest)| (Provider::Required { module, version }, rest))
    }
}

/// Where a dependency's sources come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider<'a> {
    Required { module: &'a str, version: &'a str },
    Replaced(&'a Replacement),
}

fn parse_replace(root: &Path, rest: &str) -> Option<(String, Replacement)> {
    let (from, to) = rest.split_once("=>")?;
    let from = unquote(from.split_whitespace().next()?).to_string();
    let mut to = to.split_whitespace();
    let target = unquote(to.next()?);
    let replacement = if target.starts_with("./") || target.starts_with("../") || target.starts_with('/') {
        Replacement::Dir(root.join(target))
    } else {
        Replacement::Module {
            path: target.to_string(),
            version: to.next()?.to_string(),
        }
    };
    Some((from, replacement))
}

fn unquote(s: &str) -> &str {
    s.trim_matches('"')
}

/// The package path relative to `module`, when `import_path` is inside it.
fn strip_module<'a>(import_path: &'a str, module: &str) -> Option<&'a str> {
    let rest = import_path.strip_prefix(module)?;
    if rest.is_empty() {
        Some("")
    } else {
        rest.strip_prefix('/')
    }
}

/// `base` joined with the components of a relative directory.
pub fn join_import(base: &str, rel: &Path) -> String {
    let mut path = base.to_string();
    for component in rel.components() {
        path.push('/');
        path.push_str(&component.as_os_str().to_string_lossy());
    }
    path
}

/// Module cache directory name of `module@version`: upper-case letters
/// are escaped as `!` plus the lower-case letter.
pub fn escape_module(module: &str) -> String {
    let mut out = String::with_capacity(module.len());
    for c in module.chars() {
        if c.is_ascii_uppercase() {
            out.push('!');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const GO_MOD: &str = r#"module github.com/fastbill/go-mock-gen

go 1.21

require (
	github.com/fastbill/go-httperrors/v2 v2.0.1 // indirect
	github.com/stretchr/testify v1.8.4
)

require github.com/BurntSushi/toml v1.3.2

replace github.com/acme/local => ../local
replace (
	github.com/acme/fork => github.com/me/fork v0.1.0
)
"#;

    fn module() -> Module {
        Module::parse(Path::new("/src/mockgen"), GO_MOD).unwrap()
    }

    #[test]
    fn test_parse_directives() {
        let module = module();
        assert_eq!(module.path, "github.com/fastbill/go-mock-gen");
        assert_eq!(module.requires.len(), 3);
        assert_eq!(
            module.requires[0],
            (
                "github.com/fastbill/go-httperrors/v2".to_string(),
                "v2.0.1".to_string()
            )
        );
        assert_eq!(
            module.replaces[0],
            (
                "github.com/acme/local".to_string(),
                Replacement::Dir(PathBuf::from("/src/mockgen/../local"))
            )
        );
        assert_eq!(
            module.replaces[1].1,
            Replacement::Module {
                path: "github.com/me/fork".to_string(),
                version: "v0.1.0".to_string()
            }
        );
    }

    #[test]
    fn test_missing_module_directive() {
        assert!(Module::parse(Path::new("/x"), "go 1.21\n").is_none());
    }

    #[test]
    fn test_import_paths() {
        let module = module();
        assert_eq!(
            module.import_path_of(Path::new("/src/mockgen/test/inputnew/example")).as_deref(),
            Some("github.com/fastbill/go-mock-gen/test/inputnew/example")
        );
        assert_eq!(module.import_path_of(Path::new("/elsewhere")), None);
        assert_eq!(
            module.local_dir("github.com/fastbill/go-mock-gen/test/model"),
            Some(PathBuf::from("/src/mockgen/test/model"))
        );
        assert_eq!(module.local_dir("github.com/fastbill/go-mock-genx"), None);
    }

    #[test]
    fn test_provider_prefers_longest_module() {
        let module = module();
        let (provider, rest) = module
            .provider("github.com/fastbill/go-httperrors/v2/codes")
            .unwrap();
        assert_eq!(
            provider,
            Provider::Required {
                module: "github.com/fastbill/go-httperrors/v2",
                version: "v2.0.1"
            }
        );
        assert_eq!(rest, "codes");

        let (provider, rest) = module.provider("github.com/acme/local/pkg").unwrap();
        assert!(matches!(provider, Provider::Replaced(Replacement::Dir(_))));
        assert_eq!(rest, "pkg");

        assert!(module.provider("golang.org/x/sync").is_none());
    }

    #[test]
    fn test_escape_module() {
        assert_eq!(
            escape_module("github.com/BurntSushi/toml"),
            "github.com/!burnt!sushi/toml"
        );
    }
}
