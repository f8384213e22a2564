//! Declarations read from a Go source file.
//!
//! Only what mock generation needs is kept: the package clause, imports
//! and type declarations. Function, variable and constant declarations
//! are skipped by the parser.

use mockgen_ir::ChanDir;

use super::lexer::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: String,
    pub imports: Vec<Import>,
    pub types: Vec<TypeSpec>,
}

impl SourceFile {
    pub fn find_type(&self, name: &str) -> Option<&TypeSpec> {
        self.types.iter().find(|spec| spec.name == name)
    }
}

/// `import name "path"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Explicit name, `_` or `.`; `None` when the package name is used.
    pub name: Option<String>,
    pub path: String,
}

/// `type Name[params] = Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: String,
    /// Declares type parameters.
    pub generic: bool,
    /// `type A = B`
    pub alias: bool,
    pub ty: TypeNode,
    /// Span of the declared name.
    pub span: Span,
}

/// Type syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// `name` or `package.name`
    Name {
        package: Option<String>,
        name: String,
    },
    /// `Name[Args]`; arguments are not kept.
    Instance(Box<TypeNode>),
    Pointer(Box<TypeNode>),
    Slice(Box<TypeNode>),
    /// `[N]T`; `len` is `None` when N is not an integer literal.
    Array {
        len: Option<u64>,
        elem: Box<TypeNode>,
    },
    Map {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeNode>,
    },
    Func(Signature),
    Struct(Vec<FieldDecl>),
    Interface(Vec<InterfaceElem>),
}

impl TypeNode {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name {
            package: None,
            name: name.into(),
        }
    }
}

/// Parameters and results of a function or method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    /// The last parameter is `...T`; its `ty` is `T`.
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeNode,
}

/// A struct field declaration; `names` is empty for embedded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub names: Vec<String>,
    pub ty: TypeNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    Method {
        name: String,
        sig: Signature,
        span: Span,
    },
    Embedded {
        ty: TypeNode,
        span: Span,
    },
    /// A type-set element such as `~int | ~string`.
    Constraint { span: Span },
}
