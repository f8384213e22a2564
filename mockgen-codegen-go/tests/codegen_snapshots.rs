//! Snapshot tests for generated mocks.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use mockgen_codegen_go::{BuiltinFormatter, MockGenerator};
use mockgen_ir::{
    ChanDir, InterfaceDescriptor, MethodDescriptor, Namespace, ParamDescriptor, TypeExpr,
    Underlying,
};

/// Generate and format a mock named `<Interface>Mock`.
fn generate(iface: &InterfaceDescriptor) -> String {
    MockGenerator::new(iface, format!("{}Mock", iface.name))
        .generate_formatted(&BuiltinFormatter)
        .expect("Failed to generate mock")
}

#[test]
fn test_variadic_mock() {
    let iface = InterfaceDescriptor::interface(
        "Logger",
        Namespace::new("github.com/acme/app/logging", "logging"),
        vec![
            MethodDescriptor::new("Logf")
                .param("format", TypeExpr::basic("string"))
                .variadic_param("args", TypeExpr::empty_interface()),
            MethodDescriptor::new("Sum")
                .variadic_param("xs", TypeExpr::basic("int"))
                .result(TypeExpr::basic("int")),
        ],
    );

    insta::assert_snapshot!("variadic_mock", generate(&iface));
}

#[test]
fn test_composite_types_mock() {
    let store = Namespace::new("github.com/acme/shop/store", "store");
    let event = TypeExpr::pointer(TypeExpr::named(
        Some(store.clone()),
        "Event",
        Underlying::Struct,
    ));
    let iface = InterfaceDescriptor::interface(
        "Store",
        store.clone(),
        vec![
            MethodDescriptor::new("Watch")
                .param(
                    "ctx",
                    TypeExpr::named(
                        Some(Namespace::new("context", "context")),
                        "Context",
                        Underlying::Interface,
                    ),
                )
                .param(
                    "filter",
                    TypeExpr::map(
                        TypeExpr::basic("string"),
                        TypeExpr::slice(TypeExpr::basic("string")),
                    ),
                )
                .result(TypeExpr::chan(ChanDir::Recv, event))
                .result(TypeExpr::error()),
            MethodDescriptor::new("Apply")
                .param(
                    "fn",
                    TypeExpr::Func {
                        params: vec![TypeExpr::basic("int"), TypeExpr::basic("string")],
                        results: vec![TypeExpr::error()],
                        variadic: false,
                    },
                )
                .param("opts", TypeExpr::array(2, TypeExpr::basic("bool")))
                .result(TypeExpr::named(Some(store), "Status", Underlying::Basic)),
        ],
    );

    insta::assert_snapshot!("composite_types_mock", generate(&iface));
}

#[test]
fn test_function_type_mock() {
    let http = Namespace::new("net/http", "http");
    let iface = InterfaceDescriptor::function(
        "Handler",
        Namespace::new("github.com/acme/app/web", "web"),
        vec![
            ParamDescriptor::new(
                "w",
                TypeExpr::named(Some(http.clone()), "ResponseWriter", Underlying::Interface),
            ),
            ParamDescriptor::new(
                "r",
                TypeExpr::pointer(TypeExpr::named(Some(http), "Request", Underlying::Struct)),
            ),
        ],
        vec![],
        false,
    );

    insta::assert_snapshot!("function_type_mock", generate(&iface));
}
