//! Interface, method and parameter descriptors.

use serde::{Deserialize, Serialize};

use crate::{Namespace, TypeExpr};

/// Method name given to the single method of a function-type adapter.
pub const FUNCTION_METHOD: &str = "Execute";

/// Whether a descriptor came from an interface or a function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    #[default]
    Interface,
    /// A function type mocked as a one-method interface.
    Function,
}

/// The target type a mock is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// Type name, e.g. `Exampler`.
    pub name: String,
    /// Package declaring the type.
    pub namespace: Namespace,
    #[serde(default)]
    pub kind: InterfaceKind,
    /// Methods in declaration order.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl InterfaceDescriptor {
    /// Create an interface descriptor.
    pub fn interface(
        name: impl Into<String>,
        namespace: Namespace,
        methods: Vec<MethodDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            namespace,
            kind: InterfaceKind::Interface,
            methods,
        }
    }

    /// Create a descriptor for a function type.
    ///
    /// The signature becomes a single method named [`FUNCTION_METHOD`].
    pub fn function(
        name: impl Into<String>,
        namespace: Namespace,
        params: Vec<ParamDescriptor>,
        results: Vec<ParamDescriptor>,
        variadic: bool,
    ) -> Self {
        let method = MethodDescriptor {
            name: FUNCTION_METHOD.to_string(),
            params,
            results,
            variadic,
        };
        Self {
            name: name.into(),
            namespace,
            kind: InterfaceKind::Function,
            methods: vec![method],
        }
    }

    /// `package.Name`, as written by callers of the interface.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace.name, self.name)
    }

    /// The type itself as a named type descriptor.
    pub fn as_type(&self) -> TypeExpr {
        let underlying = match self.kind {
            InterfaceKind::Interface => crate::Underlying::Interface,
            InterfaceKind::Function => crate::Underlying::Func,
        };
        TypeExpr::named(Some(self.namespace.clone()), &self.name, underlying)
    }
}

/// A method of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    #[serde(default)]
    pub results: Vec<ParamDescriptor>,
    /// The last parameter is a splatted slice (`xs ...T`).
    #[serde(default)]
    pub variadic: bool,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.params.push(ParamDescriptor::new(name, ty));
        self
    }

    /// Append a variadic tail; `elem` is wrapped in a slice.
    pub fn variadic_param(mut self, name: impl Into<String>, elem: TypeExpr) -> Self {
        self.params
            .push(ParamDescriptor::new(name, TypeExpr::slice(elem)));
        self.variadic = true;
        self
    }

    pub fn result(mut self, ty: TypeExpr) -> Self {
        self.results.push(ParamDescriptor::new("", ty));
        self
    }

    pub fn named_result(mut self, name: impl Into<String>, ty: TypeExpr) -> Self {
        self.results.push(ParamDescriptor::new(name, ty));
        self
    }
}

/// A parameter or result of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawParam")]
pub struct ParamDescriptor {
    /// Declared name; empty when anonymous.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    pub nilable: bool,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeExpr) -> Self {
        let nilable = ty.is_nilable();
        Self {
            name: name.into(),
            ty,
            nilable,
        }
    }
}

/// Wire form of a parameter; `nilable` is derived from the type when absent.
#[derive(Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: TypeExpr,
    nilable: Option<bool>,
}

impl From<RawParam> for ParamDescriptor {
    fn from(raw: RawParam) -> Self {
        let nilable = raw.nilable.unwrap_or_else(|| raw.ty.is_nilable());
        Self {
            name: raw.name,
            ty: raw.ty,
            nilable,
        }
    }
}

/// A file of interface descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSet {
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl DescriptorSet {
    /// Find an interface by name.
    pub fn find(&self, name: &str) -> Option<&InterfaceDescriptor> {
        self.interfaces.iter().find(|iface| iface.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Underlying;

    fn model() -> Namespace {
        Namespace::new("example.com/shop/model", "model")
    }

    #[test]
    fn test_function_adapter() {
        let iface = InterfaceDescriptor::function(
            "Handler",
            Namespace::new("example.com/shop/web", "web"),
            vec![ParamDescriptor::new("req", TypeExpr::basic("string"))],
            vec![ParamDescriptor::new("", TypeExpr::error())],
            false,
        );

        assert_eq!(iface.kind, InterfaceKind::Function);
        assert_eq!(iface.methods.len(), 1);
        assert_eq!(iface.methods[0].name, FUNCTION_METHOD);
        assert_eq!(iface.qualified_name(), "web.Handler");
    }

    #[test]
    fn test_param_nilable_computed() {
        let user = TypeExpr::named(Some(model()), "User", Underlying::Struct);
        let by_ptr = ParamDescriptor::new("u", TypeExpr::pointer(user.clone()));
        let by_value = ParamDescriptor::new("u", user);

        assert!(by_ptr.nilable);
        assert!(!by_value.nilable);
    }

    #[test]
    fn test_variadic_param_builder() {
        let method = MethodDescriptor::new("Log").variadic_param("xs", TypeExpr::basic("int"));
        assert!(method.variadic);
        assert_eq!(method.params[0].ty, TypeExpr::slice(TypeExpr::basic("int")));
    }

    #[test]
    fn test_deserialize_descriptor_set() {
        let json = r#"{
            "interfaces": [{
                "name": "Exampler",
                "namespace": {"path": "example.com/shop/example", "name": "example"},
                "methods": [{
                    "name": "FunctionA",
                    "params": [{
                        "name": "user",
                        "type": {"kind": "pointer", "elem": {
                            "kind": "named",
                            "name": "StructA",
                            "namespace": {"path": "example.com/shop/model", "name": "model"},
                            "underlying": "struct"
                        }}
                    }],
                    "results": [
                        {"type": {"kind": "basic", "name": "string"}},
                        {"type": {"kind": "named", "name": "error", "underlying": "interface"}}
                    ]
                }]
            }]
        }"#;

        let set: DescriptorSet = serde_json::from_str(json).unwrap();
        let iface = set.find("Exampler").expect("interface not found");
        let method = &iface.methods[0];

        assert_eq!(iface.kind, InterfaceKind::Interface);
        assert!(method.params[0].nilable);
        assert!(!method.results[0].nilable);
        assert!(method.results[1].nilable);
        assert_eq!(method.results[1].ty, TypeExpr::error());
        assert!(set.find("Missing").is_none());
    }
}
