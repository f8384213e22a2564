//! Type descriptors.

use serde::{Deserialize, Serialize};

/// A package a named type belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Import path (e.g. `github.com/acme/shop/model`).
    pub path: String,
    /// Declared package name (e.g. `model`).
    pub name: String,
}

impl Namespace {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    /// Types owned by the program entrypoint are never imported.
    pub fn is_entrypoint(&self) -> bool {
        self.name == "main"
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `<-chan T`
    Recv,
    /// `chan<- T`
    Send,
}

/// The structural kind behind a named type.
///
/// Named types can be self-referential, so only the outermost shape of
/// the underlying type is recorded. That is all nilability needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Underlying {
    Basic,
    Struct,
    Array,
    Pointer,
    Slice,
    Map,
    Interface,
    Func,
    Chan,
    /// The declaration could not be loaded.
    #[default]
    Unknown,
}

impl Underlying {
    /// Whether values of this kind can be `nil`.
    pub fn is_nilable(&self) -> bool {
        matches!(
            self,
            Self::Pointer | Self::Slice | Self::Map | Self::Interface | Self::Func | Self::Chan
        )
    }
}

/// A struct field inside an anonymous struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name; for embedded fields this is the type name.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    /// Embedded fields render as their type only.
    #[serde(default)]
    pub embedded: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            embedded: false,
        }
    }

    pub fn embedded(ty: TypeExpr) -> Self {
        let name = match &ty {
            TypeExpr::Named { name, .. } => name.clone(),
            TypeExpr::Pointer { elem } => match elem.as_ref() {
                TypeExpr::Named { name, .. } => name.clone(),
                _ => String::new(),
            },
            _ => String::new(),
        };
        Self {
            name,
            ty,
            embedded: true,
        }
    }
}

/// A resolved type.
///
/// This is a closed set: every shape the generator can render has a
/// variant here, so rendering is an exhaustive `match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeExpr {
    /// A declared type, e.g. `model.User` or `error`.
    Named {
        name: String,
        /// `None` for predeclared types such as `error`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        namespace: Option<Namespace>,
        #[serde(default)]
        underlying: Underlying,
    },
    /// A predeclared basic type (`int`, `string`, `float64`, ...).
    Basic { name: String },
    Pointer { elem: Box<TypeExpr> },
    Array { len: u64, elem: Box<TypeExpr> },
    Slice { elem: Box<TypeExpr> },
    Func {
        #[serde(default)]
        params: Vec<TypeExpr>,
        #[serde(default)]
        results: Vec<TypeExpr>,
        #[serde(default)]
        variadic: bool,
    },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    Struct {
        #[serde(default)]
        fields: Vec<Field>,
    },
    /// An inline interface. Only the method names are kept; any method
    /// makes the type unrenderable.
    Interface {
        #[serde(default)]
        methods: Vec<String>,
    },
}

impl TypeExpr {
    pub fn named(
        namespace: Option<Namespace>,
        name: impl Into<String>,
        underlying: Underlying,
    ) -> Self {
        Self::Named {
            name: name.into(),
            namespace,
            underlying,
        }
    }

    pub fn basic(name: impl Into<String>) -> Self {
        Self::Basic { name: name.into() }
    }

    pub fn pointer(elem: TypeExpr) -> Self {
        Self::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: TypeExpr) -> Self {
        Self::Slice {
            elem: Box::new(elem),
        }
    }

    pub fn array(len: u64, elem: TypeExpr) -> Self {
        Self::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        Self::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(dir: ChanDir, elem: TypeExpr) -> Self {
        Self::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    /// `interface{}`
    pub fn empty_interface() -> Self {
        Self::Interface {
            methods: Vec::new(),
        }
    }

    /// The predeclared `error` interface.
    pub fn error() -> Self {
        Self::named(None, "error", Underlying::Interface)
    }

    /// The outermost structural kind of this type.
    pub fn underlying(&self) -> Underlying {
        match self {
            Self::Named { underlying, .. } => *underlying,
            Self::Basic { .. } => Underlying::Basic,
            Self::Pointer { .. } => Underlying::Pointer,
            Self::Array { .. } => Underlying::Array,
            Self::Slice { .. } => Underlying::Slice,
            Self::Func { .. } => Underlying::Func,
            Self::Map { .. } => Underlying::Map,
            Self::Chan { .. } => Underlying::Chan,
            Self::Struct { .. } => Underlying::Struct,
            Self::Interface { .. } => Underlying::Interface,
        }
    }

    /// Whether values of this type can be `nil`.
    ///
    /// Named types answer through their underlying kind.
    pub fn is_nilable(&self) -> bool {
        self.underlying().is_nilable()
    }

    /// Whether this is an interface without methods.
    pub fn is_empty_interface(&self) -> bool {
        matches!(self, Self::Interface { methods } if methods.is_empty())
    }
}
