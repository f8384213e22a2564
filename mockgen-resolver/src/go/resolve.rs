//! Mapping Go declarations to interface descriptors.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use mockgen_core::{Config, Error, Result, import_path_name};
use mockgen_ir::{
    Field, InterfaceDescriptor, MethodDescriptor, Namespace, ParamDescriptor, TypeExpr, Underlying,
};

use super::{
    ast::{InterfaceElem, Param, Signature, SourceFile, TypeNode, TypeSpec},
    package::{Package, PackageLoader, SearchPaths},
};
use crate::InterfaceResolver;

/// Predeclared non-interface types.
const BASIC_TYPES: &[&str] = &[
    "bool", "string", "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16",
    "uint32", "uint64", "uintptr", "byte", "rune", "float32", "float64", "complex64",
    "complex128",
];

/// Bound on chains of named types followed to find an underlying kind.
const MAX_DEPTH: usize = 16;

/// Resolves interfaces and function types from Go source files.
///
/// `path` is a `.go` file or a package directory. Loaded packages are
/// cached per directory for the lifetime of the resolver.
pub struct GoResolver {
    search: SearchPaths,
    loaders: HashMap<PathBuf, PackageLoader>,
}

impl GoResolver {
    pub fn new(search: SearchPaths) -> Self {
        Self {
            search,
            loaders: HashMap::new(),
        }
    }

    /// Package roots and vendor directory from `config`, toolchain
    /// locations from the environment.
    pub fn from_config(config: &Config) -> Self {
        Self::new(SearchPaths::from_env(
            config.package_roots(),
            config.resolve.vendor.clone(),
        ))
    }
}

impl Default for GoResolver {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl InterfaceResolver for GoResolver {
    fn resolve(&mut self, path: &Path, name: &str) -> Result<InterfaceDescriptor> {
        let meta = fs::metadata(path).map_err(|e| Error::io("read", path, e))?;
        let (dir, strict) = if meta.is_dir() {
            (path, None)
        } else {
            let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
            (parent.unwrap_or(Path::new(".")), Some(path))
        };
        let dir = fs::canonicalize(dir).map_err(|e| Error::io("read", dir, e))?;

        let search = &self.search;
        let loader = self
            .loaders
            .entry(dir.clone())
            .or_insert_with(|| PackageLoader::new(&dir, search.clone()));
        let target = loader.load_target(&dir, strict)?;
        tracing::debug!(
            package = %target.package.path,
            files = target.package.files.len(),
            "loaded target package"
        );

        let Some((file, index)) = target.package.find_type(name) else {
            return Err(match target.skipped {
                Some(err) => err,
                None => Error::not_found(name, path.display().to_string()),
            });
        };
        let decl = Decl {
            scope: Scope {
                package: target.package,
                file,
            },
            index,
        };

        let iface = Session { loader }.describe(decl, name)?;
        tracing::debug!(
            interface = %iface.qualified_name(),
            methods = iface.methods.len(),
            "resolved interface"
        );
        Ok(iface)
    }
}

/// A file of a loaded package, for name lookup.
struct Scope {
    package: Rc<Package>,
    file: usize,
}

impl Scope {
    fn file(&self) -> &SourceFile {
        &self.package.files[self.file]
    }

    fn namespace(&self) -> Namespace {
        Namespace::new(&self.package.path, &self.package.name)
    }

    fn decl(&self, name: &str) -> Option<Decl> {
        let (file, index) = self.package.find_type(name)?;
        Some(Decl {
            scope: Scope {
                package: Rc::clone(&self.package),
                file,
            },
            index,
        })
    }
}

/// A type declaration and the scope it was declared in.
struct Decl {
    scope: Scope,
    index: usize,
}

impl Decl {
    fn spec(&self) -> &TypeSpec {
        &self.scope.file().types[self.index]
    }

    fn key(&self) -> (String, String) {
        (self.scope.package.path.clone(), self.spec().name.clone())
    }
}

/// What a type name refers to.
enum Target {
    Decl(Decl),
    /// A predeclared type of the given kind.
    Predeclared(Underlying),
    /// A name whose declaration could not be loaded.
    Unresolved(Namespace),
}

struct Session<'a> {
    loader: &'a mut PackageLoader,
}

impl Session<'_> {
    fn describe(&mut self, decl: Decl, name: &str) -> Result<InterfaceDescriptor> {
        let namespace = decl.scope.namespace();
        let mut current = decl;

        for _ in 0..MAX_DEPTH {
            let spec = current.spec();
            if spec.generic {
                return Err(Error::resolution(format!(
                    "generic type '{}' is not supported",
                    spec.name
                )));
            }
            let next = match &spec.ty {
                TypeNode::Interface(elems) => {
                    let mut visiting = vec![current.key()];
                    let methods = self.method_set(&current.scope, elems, &mut visiting)?;
                    return Ok(InterfaceDescriptor::interface(name, namespace, methods));
                }
                TypeNode::Func(sig) => {
                    let method = self.method(&current.scope, "", sig)?;
                    return Ok(InterfaceDescriptor::function(
                        name,
                        namespace,
                        method.params,
                        method.results,
                        method.variadic,
                    ));
                }
                TypeNode::Name {
                    package,
                    name: target,
                } => match self.lookup(&current.scope, package.as_deref(), target)? {
                    Target::Decl(next) => next,
                    _ => return Err(not_mockable(name)),
                },
                _ => return Err(not_mockable(name)),
            };
            tracing::trace!(ty = %next.spec().name, "following type definition");
            current = next;
        }
        Err(not_mockable(name))
    }

    /// Resolve what `name`, optionally qualified, refers to from `scope`.
    fn lookup(&mut self, scope: &Scope, qualifier: Option<&str>, name: &str) -> Result<Target> {
        let Some(qualifier) = qualifier else {
            if let Some(decl) = scope.decl(name) {
                return Ok(Target::Decl(decl));
            }
            if let Some(kind) = predeclared(name) {
                return Ok(Target::Predeclared(kind));
            }
            for import in scope.file().imports.iter().filter(|i| i.name.as_deref() == Some(".")) {
                let package = self.loader.load_import(&import.path);
                if let Some(decl) = package.and_then(|package| Scope { package, file: 0 }.decl(name)) {
                    return Ok(Target::Decl(decl));
                }
            }
            tracing::warn!(package = %scope.package.path, ty = name, "undeclared type name");
            return Ok(Target::Unresolved(scope.namespace()));
        };

        let (path, package) = self.import(scope, qualifier)?;
        match package {
            Some(package) => {
                let namespace = Namespace::new(&path, &package.name);
                match (Scope { package, file: 0 }).decl(name) {
                    Some(decl) => Ok(Target::Decl(decl)),
                    None => {
                        tracing::warn!(package = %path, ty = name, "type not declared in package");
                        Ok(Target::Unresolved(namespace))
                    }
                }
            }
            None => {
                let guessed = import_path_name(&path);
                tracing::warn!(
                    package = %path,
                    ty = name,
                    assumed = %guessed,
                    "package not found, assuming its name from the import path"
                );
                Ok(Target::Unresolved(Namespace::new(path, guessed)))
            }
        }
    }

    /// The import of `scope`'s file referred to as `qualifier`.
    fn import(&mut self, scope: &Scope, qualifier: &str) -> Result<(String, Option<Rc<Package>>)> {
        let imports = &scope.file().imports;
        if let Some(import) = imports.iter().find(|i| i.name.as_deref() == Some(qualifier)) {
            return Ok((import.path.clone(), self.loader.load_import(&import.path)));
        }

        let unnamed: Vec<&str> = imports
            .iter()
            .filter(|i| i.name.is_none())
            .map(|i| i.path.as_str())
            .collect();
        if let Some(path) = unnamed.iter().find(|p| import_path_name(p) == qualifier) {
            return Ok((path.to_string(), self.loader.load_import(path)));
        }
        for path in unnamed {
            if let Some(package) = self.loader.load_import(path) {
                if package.name == qualifier {
                    return Ok((path.to_string(), Some(package)));
                }
            }
        }
        Err(Error::resolution(format!(
            "undefined package '{qualifier}' in package {}",
            scope.package.path
        )))
    }

    /// Structural kind behind a type, following named types.
    fn underlying(&mut self, scope: &Scope, node: &TypeNode, depth: usize) -> Underlying {
        match node {
            TypeNode::Name { package, name } => {
                if depth >= MAX_DEPTH {
                    return Underlying::Unknown;
                }
                match self.lookup(scope, package.as_deref(), name) {
                    Ok(Target::Decl(decl)) => self.underlying(&decl.scope, &decl.spec().ty, depth + 1),
                    Ok(Target::Predeclared(kind)) => kind,
                    Ok(Target::Unresolved(_)) | Err(_) => Underlying::Unknown,
                }
            }
            TypeNode::Instance(base) => self.underlying(scope, base, depth),
            TypeNode::Pointer(_) => Underlying::Pointer,
            TypeNode::Slice(_) => Underlying::Slice,
            TypeNode::Array { .. } => Underlying::Array,
            TypeNode::Map { .. } => Underlying::Map,
            TypeNode::Chan { .. } => Underlying::Chan,
            TypeNode::Func(_) => Underlying::Func,
            TypeNode::Struct(_) => Underlying::Struct,
            TypeNode::Interface(_) => Underlying::Interface,
        }
    }

    fn type_expr(&mut self, scope: &Scope, node: &TypeNode) -> Result<TypeExpr> {
        Ok(match node {
            TypeNode::Name { package, name } => self.named(scope, package.as_deref(), name)?,
            TypeNode::Instance(base) => {
                return Err(Error::resolution(format!(
                    "instantiated generic type '{}' is not supported",
                    display_name(base)
                )));
            }
            TypeNode::Pointer(elem) => TypeExpr::pointer(self.type_expr(scope, elem)?),
            TypeNode::Slice(elem) => TypeExpr::slice(self.type_expr(scope, elem)?),
            TypeNode::Array { len, elem } => {
                let Some(len) = len else {
                    return Err(Error::resolution(
                        "array length must be an integer literal",
                    ));
                };
                TypeExpr::array(*len, self.type_expr(scope, elem)?)
            }
            TypeNode::Map { key, value } => {
                TypeExpr::map(self.type_expr(scope, key)?, self.type_expr(scope, value)?)
            }
            TypeNode::Chan { dir, elem } => TypeExpr::chan(*dir, self.type_expr(scope, elem)?),
            TypeNode::Func(sig) => {
                let method = self.method(scope, "", sig)?;
                TypeExpr::Func {
                    params: method.params.into_iter().map(|p| p.ty).collect(),
                    results: method.results.into_iter().map(|p| p.ty).collect(),
                    variadic: method.variadic,
                }
            }
            TypeNode::Struct(decls) => {
                let mut fields = Vec::new();
                for decl in decls {
                    let ty = self.type_expr(scope, &decl.ty)?;
                    if decl.names.is_empty() {
                        fields.push(Field::embedded(ty));
                    } else {
                        fields.extend(decl.names.iter().map(|n| Field::new(n, ty.clone())));
                    }
                }
                TypeExpr::Struct { fields }
            }
            TypeNode::Interface(elems) => {
                let methods = self.method_set(scope, elems, &mut Vec::new())?;
                TypeExpr::Interface {
                    methods: methods.into_iter().map(|m| m.name).collect(),
                }
            }
        })
    }

    fn named(&mut self, scope: &Scope, qualifier: Option<&str>, name: &str) -> Result<TypeExpr> {
        let mut target = self.lookup(scope, qualifier, name)?;
        // `type A = B` stands for B itself
        for _ in 0..MAX_DEPTH {
            let Target::Decl(decl) = &target else { break };
            let spec = decl.spec();
            if !spec.alias {
                break;
            }
            target = match &spec.ty {
                TypeNode::Name { package, name } => {
                    match self.lookup(&decl.scope, package.as_deref(), name)? {
                        Target::Decl(next) => Target::Decl(next),
                        _ => return self.named(&decl.scope, package.as_deref(), name),
                    }
                }
                other => return self.type_expr(&decl.scope, other),
            };
        }

        Ok(match target {
            Target::Decl(decl) => {
                let underlying = self.underlying(&decl.scope, &decl.spec().ty, 1);
                TypeExpr::named(Some(decl.scope.namespace()), &decl.spec().name, underlying)
            }
            Target::Predeclared(_) => match name {
                "error" => TypeExpr::error(),
                "any" => TypeExpr::empty_interface(),
                "comparable" => TypeExpr::named(None, name, Underlying::Interface),
                _ => TypeExpr::basic(name),
            },
            Target::Unresolved(namespace) => TypeExpr::named(Some(namespace), name, Underlying::Unknown),
        })
    }

    fn method(&mut self, scope: &Scope, name: &str, sig: &Signature) -> Result<MethodDescriptor> {
        Ok(MethodDescriptor {
            name: name.to_string(),
            params: self.params(scope, &sig.params, sig.variadic)?,
            results: self.params(scope, &sig.results, false)?,
            variadic: sig.variadic,
        })
    }

    fn params(&mut self, scope: &Scope, params: &[Param], variadic: bool) -> Result<Vec<ParamDescriptor>> {
        let last = params.len().saturating_sub(1);
        params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let mut ty = self.type_expr(scope, &param.ty)?;
                if variadic && i == last {
                    ty = TypeExpr::slice(ty);
                }
                Ok(ParamDescriptor::new(
                    param.name.clone().unwrap_or_default(),
                    ty,
                ))
            })
            .collect()
    }

    /// Methods of an interface body, embedded interfaces expanded, sorted
    /// by name.
    fn method_set(
        &mut self,
        scope: &Scope,
        elems: &[InterfaceElem],
        visiting: &mut Vec<(String, String)>,
    ) -> Result<Vec<MethodDescriptor>> {
        let mut methods = Vec::new();
        for elem in elems {
            match elem {
                InterfaceElem::Method { name, sig, .. } => methods.push(self.method(scope, name, sig)?),
                InterfaceElem::Embedded { ty, .. } => methods.extend(self.embedded(scope, ty, visiting)?),
                InterfaceElem::Constraint { .. } => return Err(constraint_error()),
            }
        }
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        methods.dedup_by(|a, b| a.name == b.name);
        Ok(methods)
    }

    fn embedded(
        &mut self,
        scope: &Scope,
        ty: &TypeNode,
        visiting: &mut Vec<(String, String)>,
    ) -> Result<Vec<MethodDescriptor>> {
        let (qualifier, name) = match ty {
            TypeNode::Interface(elems) => return self.method_set(scope, elems, visiting),
            TypeNode::Name { package, name } => (package.as_deref(), name.as_str()),
            TypeNode::Instance(base) => {
                return Err(Error::resolution(format!(
                    "embedding instantiated generic interface '{}' is not supported",
                    display_name(base)
                )));
            }
            _ => return Err(constraint_error()),
        };

        let decl = match self.lookup(scope, qualifier, name)? {
            Target::Decl(decl) => decl,
            Target::Predeclared(_) => {
                return match name {
                    "error" => Ok(vec![
                        MethodDescriptor::new("Error").result(TypeExpr::basic("string")),
                    ]),
                    "any" => Ok(Vec::new()),
                    _ => Err(constraint_error()),
                };
            }
            Target::Unresolved(namespace) => {
                return Err(Error::resolution(format!(
                    "cannot expand embedded interface '{}.{name}': declaration not found",
                    namespace.name
                )));
            }
        };

        let key = decl.key();
        if visiting.contains(&key) {
            return Err(Error::resolution(format!("interface '{name}' embeds itself")));
        }
        let spec = decl.spec();
        if spec.generic {
            return Err(Error::resolution(format!(
                "embedding generic interface '{name}' is not supported"
            )));
        }

        visiting.push(key);
        let methods = match &spec.ty {
            TypeNode::Interface(elems) => self.method_set(&decl.scope, elems, visiting),
            named @ TypeNode::Name { .. } => self.embedded(&decl.scope, named, visiting),
            _ => Err(constraint_error()),
        };
        visiting.pop();
        methods
    }
}

fn predeclared(name: &str) -> Option<Underlying> {
    match name {
        "error" | "any" | "comparable" => Some(Underlying::Interface),
        _ if BASIC_TYPES.contains(&name) => Some(Underlying::Basic),
        _ => None,
    }
}

fn display_name(node: &TypeNode) -> String {
    match node {
        TypeNode::Name {
            package: Some(package),
            name,
        } => format!("{package}.{name}"),
        TypeNode::Name { name, .. } => name.clone(),
        _ => "type".to_string(),
    }
}

fn not_mockable(name: &str) -> Box<Error> {
    Error::resolution(format!(
        "'{name}' is neither an interface nor a function type"
    ))
}

fn constraint_error() -> Box<Error> {
    Error::resolution("interfaces with type set elements can only be used as constraints")
}
