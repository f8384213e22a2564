use std::path::PathBuf;

use mockgen_codegen::generation::{ImportCollector, NamespaceBindings};
use mockgen_core::{Config, DEFAULT_MOCK_PACKAGE, Result, import_path_name};
use mockgen_ir::{InterfaceDescriptor, Namespace, TypeExpr};

use crate::{
    GoFile,
    ast::{Method, Struct},
    body::method_body,
    format::SourceFormatter,
    signature::plan,
    type_renderer::render_type,
};

/// Receiver variable of generated methods.
const RECEIVER: &str = "m";

/// Settings that shape a generated mock.
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Import path of the call-recording library.
    pub mock_package: String,
    /// Appended to the interface's package name to form the mock package.
    pub suffix: String,
    /// Package roots absolute import paths are made relative to.
    pub roots: Vec<PathBuf>,
    /// Vendored-dependency marker directory.
    pub vendor: String,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            mock_package: DEFAULT_MOCK_PACKAGE.to_string(),
            suffix: "mock".to_string(),
            roots: Vec::new(),
            vendor: "vendor".to_string(),
        }
    }
}

impl MockOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mock_package: config.mock.package.clone(),
            suffix: config.mock.suffix.clone(),
            roots: config.package_roots(),
            vendor: config.resolve.vendor.clone(),
        }
    }

    /// Package (and directory) name of the mock for `iface`.
    pub fn mock_package_name(&self, iface: &InterfaceDescriptor) -> String {
        format!("{}{}", iface.namespace.name, self.suffix)
    }
}

/// Generates the source of a mock struct for one interface.
///
/// Each generator owns its namespace bindings, so aliases are stable
/// within one file and independent across files.
pub struct MockGenerator<'a> {
    iface: &'a InterfaceDescriptor,
    struct_name: String,
    options: MockOptions,
}

impl<'a> MockGenerator<'a> {
    pub fn new(iface: &'a InterfaceDescriptor, struct_name: impl Into<String>) -> Self {
        Self {
            iface,
            struct_name: struct_name.into(),
            options: MockOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MockOptions) -> Self {
        self.options = options;
        self
    }

    pub fn struct_name(&self) -> &str {
        &self.struct_name
    }

    /// Package name of the generated file.
    pub fn package_name(&self) -> String {
        self.options.mock_package_name(self.iface)
    }

    fn bindings(&self) -> NamespaceBindings {
        NamespaceBindings::new()
            .with_roots(self.options.roots.iter().cloned())
            .with_vendor(&self.options.vendor)
    }

    /// Generate the unformatted mock source.
    pub fn generate(&self) -> Result<String> {
        let qualified = self.iface.qualified_name();
        tracing::debug!(
            interface = %qualified,
            mock = %self.struct_name,
            methods = self.iface.methods.len(),
            "generating mock"
        );

        let mut bindings = self.bindings();
        let mock_name = import_path_name(&self.options.mock_package);
        let mock_alias = bindings.bind(&self.options.mock_package, &mock_name);

        // Bind every referenced namespace before naming parameters, so a
        // parameter never shadows an alias used by a later method.
        let mut referenced = Vec::new();
        for method in &self.iface.methods {
            for param in method.params.iter().chain(&method.results) {
                render_type(&param.ty, &mut bindings)?;
                collect_namespaces(&param.ty, &mut referenced);
            }
        }

        let mut imports = ImportCollector::new();
        imports.add(
            &bindings.localize(&self.options.mock_package),
            &mock_alias,
        );
        for ns in &referenced {
            let alias = bindings.bind(&ns.path, &ns.name);
            imports.add(&bindings.localize(&ns.path), &alias);
        }

        let own_package = &self.iface.namespace.name;
        let mut methods = Vec::with_capacity(self.iface.methods.len());
        for method in &self.iface.methods {
            let params = plan(&method.params, method.variadic, &mut bindings, own_package)?;
            let results = plan(&method.results, false, &mut bindings, own_package)?;
            tracing::trace!(method = %method.name, params = ?params.params, results = ?results.types, "planned method");

            methods.push(
                Method::new(RECEIVER, &self.struct_name, &method.name)
                    .doc(format!(
                        "{} is a mock implementation of {}#{}.",
                        method.name, qualified, method.name
                    ))
                    .params(params.params.iter().cloned())
                    .results(results.types.iter().cloned())
                    .body(method_body(&params, &results)),
            );
        }

        let mock_struct = Struct::new(&self.struct_name)
            .doc(format!(
                "{} is a mock implementation of the {} interface.",
                self.struct_name, qualified
            ))
            .embed(format!("{mock_alias}.Mock"));

        Ok(GoFile::new(self.package_name())
            .imports(imports)
            .add(mock_struct)
            .add_all(methods)
            .render())
    }

    /// Generate the mock and pass it through `formatter`.
    pub fn generate_formatted(&self, formatter: &dyn SourceFormatter) -> Result<String> {
        let raw = self.generate()?;
        formatter.format(&raw)
    }
}

/// Namespaces of the named types in `ty`, in first-reference order,
/// skipping predeclared and entrypoint types.
fn collect_namespaces(ty: &TypeExpr, out: &mut Vec<Namespace>) {
    match ty {
        TypeExpr::Named {
            namespace: Some(ns),
            ..
        } => {
            if !ns.is_entrypoint() && !out.iter().any(|seen| seen.path == ns.path) {
                out.push(ns.clone());
            }
        }
        TypeExpr::Named { .. } | TypeExpr::Basic { .. } | TypeExpr::Interface { .. } => {}
        TypeExpr::Pointer { elem }
        | TypeExpr::Array { elem, .. }
        | TypeExpr::Slice { elem }
        | TypeExpr::Chan { elem, .. } => collect_namespaces(elem, out),
        TypeExpr::Map { key, value } => {
            collect_namespaces(key, out);
            collect_namespaces(value, out);
        }
        TypeExpr::Func {
            params, results, ..
        } => {
            for t in params.iter().chain(results) {
                collect_namespaces(t, out);
            }
        }
        TypeExpr::Struct { fields } => {
            for field in fields {
                collect_namespaces(&field.ty, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mockgen_core::ErrorKind;
    use mockgen_ir::{MethodDescriptor, ParamDescriptor, Underlying};

    use super::*;

    fn example(methods: Vec<MethodDescriptor>) -> InterfaceDescriptor {
        InterfaceDescriptor::interface(
            "Exampler",
            Namespace::new("github.com/acme/app/example", "example"),
            methods,
        )
    }

    fn model(path: &str, name: &str) -> TypeExpr {
        TypeExpr::pointer(TypeExpr::named(
            Some(Namespace::new(path, "model")),
            name,
            Underlying::Struct,
        ))
    }

    #[test]
    fn test_package_name_uses_suffix() {
        let iface = example(vec![]);
        let generator = MockGenerator::new(&iface, "TestMock");
        assert_eq!(generator.package_name(), "examplemock");

        let options = MockOptions {
            suffix: "fake".to_string(),
            ..MockOptions::default()
        };
        let generator = MockGenerator::new(&iface, "TestMock").with_options(options);
        assert_eq!(generator.package_name(), "examplefake");
    }

    #[test]
    fn test_empty_interface_has_struct_only() {
        let iface = example(vec![]);
        let code = MockGenerator::new(&iface, "TestMock").generate().unwrap();

        assert_eq!(
            code,
            "package examplemock\n\
             \n\
             import (\n\
             \t\"github.com/stretchr/testify/mock\"\n\
             )\n\
             \n\
             // TestMock is a mock implementation of the example.Exampler interface.\n\
             type TestMock struct {\n\
             \tmock.Mock\n\
             }\n"
        );
    }

    #[test]
    fn test_only_referenced_namespaces_are_imported() {
        let iface = example(vec![
            MethodDescriptor::new("Get")
                .param("ctx", TypeExpr::named(
                    Some(Namespace::new("context", "context")),
                    "Context",
                    Underlying::Interface,
                ))
                .result(model("github.com/acme/app/model", "User")),
        ]);
        let code = MockGenerator::new(&iface, "TestMock").generate().unwrap();

        assert!(code.contains("import (\n\t\"context\"\n\n\t\"github.com/acme/app/model\"\n"));
        assert!(!code.contains("\"github.com/acme/app/example\""));
    }

    #[test]
    fn test_colliding_packages_are_aliased() {
        let iface = example(vec![
            MethodDescriptor::new("Convert")
                .param("in", model("github.com/acme/api/model", "User"))
                .result(model("github.com/acme/db/model", "User")),
        ]);
        let code = MockGenerator::new(&iface, "TestMock").generate().unwrap();

        assert!(code.contains("\t\"github.com/acme/api/model\"\n"));
        assert!(code.contains("\tdbmodel \"github.com/acme/db/model\"\n"));
        assert!(code.contains("func (m *TestMock) Convert(in *model.User) *dbmodel.User {"));
    }

    #[test]
    fn test_param_named_like_later_alias_is_renamed() {
        let iface = example(vec![
            MethodDescriptor::new("A").param("model", TypeExpr::basic("string")),
            MethodDescriptor::new("B").param("u", model("github.com/acme/app/model", "User")),
        ]);
        let code = MockGenerator::new(&iface, "TestMock").generate().unwrap();

        assert!(code.contains("func (m *TestMock) A(_a0 string) {\n\tm.Called(_a0)\n}"));
    }

    #[test]
    fn test_inline_interface_with_methods_fails() {
        let iface = example(vec![MethodDescriptor::new("Bad").param(
            "x",
            TypeExpr::Interface {
                methods: vec!["Close".to_string()],
            },
        )]);
        let err = MockGenerator::new(&iface, "TestMock").generate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Construction);
    }

    #[test]
    fn test_function_type_generates_execute() {
        let iface = InterfaceDescriptor::function(
            "Handler",
            Namespace::new("github.com/acme/app/example", "example"),
            vec![ParamDescriptor::new("input", TypeExpr::basic("string"))],
            vec![ParamDescriptor::new("", TypeExpr::error())],
            false,
        );
        let code = MockGenerator::new(&iface, "HandlerMock").generate().unwrap();

        assert!(code.contains("// Execute is a mock implementation of example.Handler#Execute.\n"));
        assert!(code.contains("func (m *HandlerMock) Execute(input string) error {"));
    }
}
