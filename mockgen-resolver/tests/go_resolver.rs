//! Resolution of interfaces from Go module trees.

use std::{fs, path::Path};

use mockgen_core::ErrorKind;
use mockgen_ir::{
    FUNCTION_METHOD, InterfaceDescriptor, InterfaceKind, Namespace, TypeExpr, Underlying,
};
use mockgen_resolver::{GoResolver, InterfaceResolver, SearchPaths};
use tempfile::TempDir;

const MODULE: &str = "github.com/fastbill/go-mock-gen";

const MODEL: &str = "package model

// StructA is a test struct.
type StructA struct {
	Name string `json:\"name\"`
}

// StructB is a test struct.
type StructB struct{ ID int }

type Handlers map[string]func() error
";

const EXAMPLE: &str = "package example

import \"github.com/fastbill/go-mock-gen/test/inputnew/model\"

// Exampler is an interface for the test.
type Exampler interface {
	FunctionA(user *model.StructA) (resultStr string, err error)
	FunctionZ(id int, user *model.StructA) (*model.StructB, *model.StructA, error)
	FunctionC(name, address string, age int) *model.StructA
}
";

fn write(root: &Path, path: &str, content: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn module_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "go.mod", &format!("module {MODULE}\n\ngo 1.21\n"));
    write(tmp.path(), "test/inputnew/model/model.go", MODEL);
    write(tmp.path(), "test/inputnew/example/types.go", EXAMPLE);
    tmp
}

fn resolver() -> GoResolver {
    GoResolver::new(SearchPaths {
        vendor: "vendor".to_string(),
        ..SearchPaths::default()
    })
}

fn resolve(root: &Path, file: &str, name: &str) -> InterfaceDescriptor {
    resolver().resolve(&root.join(file), name).unwrap()
}

fn resolve_err(root: &Path, file: &str, name: &str) -> Box<mockgen_core::Error> {
    resolver().resolve(&root.join(file), name).unwrap_err()
}

fn model() -> Namespace {
    Namespace::new(format!("{MODULE}/test/inputnew/model"), "model")
}

fn struct_a() -> TypeExpr {
    TypeExpr::pointer(TypeExpr::named(Some(model()), "StructA", Underlying::Struct))
}

fn method_names(iface: &InterfaceDescriptor) -> Vec<&str> {
    iface.methods.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn test_resolve_exampler() {
    let tmp = module_tree();
    let iface = resolve(tmp.path(), "test/inputnew/example/types.go", "Exampler");

    assert_eq!(iface.kind, InterfaceKind::Interface);
    assert_eq!(
        iface.namespace,
        Namespace::new(format!("{MODULE}/test/inputnew/example"), "example")
    );
    assert_eq!(method_names(&iface), ["FunctionA", "FunctionC", "FunctionZ"]);

    let a = &iface.methods[0];
    assert_eq!(a.params[0].name, "user");
    assert_eq!(a.params[0].ty, struct_a());
    assert!(a.params[0].nilable);
    assert_eq!(a.results[0].name, "resultStr");
    assert_eq!(a.results[0].ty, TypeExpr::basic("string"));
    assert_eq!(a.results[1].ty, TypeExpr::error());

    let c = &iface.methods[1];
    let names: Vec<_> = c.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["name", "address", "age"]);
    assert_eq!(c.params[1].ty, TypeExpr::basic("string"));
    assert_eq!(c.params[2].ty, TypeExpr::basic("int"));

    let z = &iface.methods[2];
    assert_eq!(z.results.len(), 3);
    assert!(z.results.iter().all(|r| r.nilable && r.name.is_empty()));
    assert_eq!(
        z.results[0].ty,
        TypeExpr::pointer(TypeExpr::named(Some(model()), "StructB", Underlying::Struct))
    );
}

#[test]
fn test_resolve_package_directory() {
    let tmp = module_tree();
    let iface = resolve(tmp.path(), "test/inputnew/example", "Exampler");
    assert_eq!(iface.methods.len(), 3);
}

#[test]
fn test_unavailable_package_assumes_name_from_path() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "test/inputfix/example/types.go",
        "package example

import (
	\"github.com/fastbill/go-httperrors/v2\"
	\"github.com/fastbill/go-mock-gen/test/inputnew/model\"
)

type Exampler interface {
	FunctionD(user *model.StructA) *httperrors.HTTPError
}
",
    );

    let iface = resolve(tmp.path(), "test/inputfix/example/types.go", "Exampler");
    let result = &iface.methods[0].results[0];
    assert_eq!(
        result.ty,
        TypeExpr::pointer(TypeExpr::named(
            Some(Namespace::new("github.com/fastbill/go-httperrors/v2", "httperrors")),
            "HTTPError",
            Underlying::Unknown,
        ))
    );
    assert!(result.nilable);
}

#[test]
fn test_aliased_import_and_named_underlying() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "web/web.go",
        "package web

import m \"github.com/fastbill/go-mock-gen/test/inputnew/model\"

type Router interface {
	Routes() m.Handlers
	Lookup(id m.StructB) (m.StructB, bool)
}
",
    );

    let iface = resolve(tmp.path(), "web/web.go", "Router");
    assert_eq!(method_names(&iface), ["Lookup", "Routes"]);
    assert!(!iface.methods[0].results[0].nilable);
    assert_eq!(
        iface.methods[1].results[0].ty,
        TypeExpr::named(Some(model()), "Handlers", Underlying::Map)
    );
    assert!(iface.methods[1].results[0].nilable);
}

#[test]
fn test_embedded_interfaces_are_expanded() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "store/store.go",
        "package store

import \"github.com/fastbill/go-mock-gen/store/base\"

type Reader interface {
	Get(key string) ([]byte, error)
}

type Store interface {
	Reader
	base.Closer
	error
	interface{ Flush() }
	Put(key string, value []byte) error
	Get(key string) ([]byte, error)
}
",
    );
    write(
        tmp.path(),
        "store/base/base.go",
        "package base

type Closer interface {
	Close() error
}
",
    );

    let iface = resolve(tmp.path(), "store/store.go", "Store");
    assert_eq!(
        method_names(&iface),
        ["Close", "Error", "Flush", "Get", "Put"]
    );
    assert_eq!(iface.methods[1].results[0].ty, TypeExpr::basic("string"));
}

#[test]
fn test_composite_types() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "events/events.go",
        "package events

import \"context\"

type (
	Event struct{ ID int }

	Any = interface{}

	Bus interface {
		Watch(ctx context.Context, topics ...string) (<-chan *Event, func())
		Publish(events map[string][]Event, meta [4]byte, extra any) chan<- Any
		Snapshot() struct {
			Event
			Count, Total int
		}
	}
)
",
    );

    let iface = resolve(tmp.path(), "events/events.go", "Bus");
    let ns = Namespace::new(format!("{MODULE}/events"), "events");
    let event = TypeExpr::named(Some(ns.clone()), "Event", Underlying::Struct);
    let [publish, snapshot, watch] = iface.methods.as_slice() else {
        panic!("unexpected methods: {:?}", method_names(&iface));
    };

    assert!(watch.variadic);
    assert_eq!(
        watch.params[1].ty,
        TypeExpr::slice(TypeExpr::basic("string"))
    );
    assert_eq!(
        watch.params[0].ty,
        TypeExpr::named(
            Some(Namespace::new("context", "context")),
            "Context",
            Underlying::Unknown
        )
    );
    assert_eq!(
        watch.results[0].ty,
        TypeExpr::chan(mockgen_ir::ChanDir::Recv, TypeExpr::pointer(event.clone()))
    );
    assert_eq!(
        watch.results[1].ty,
        TypeExpr::Func {
            params: vec![],
            results: vec![],
            variadic: false
        }
    );

    assert_eq!(
        publish.params[0].ty,
        TypeExpr::map(TypeExpr::basic("string"), TypeExpr::slice(event.clone()))
    );
    assert_eq!(
        publish.params[1].ty,
        TypeExpr::array(4, TypeExpr::basic("byte"))
    );
    assert_eq!(publish.params[2].ty, TypeExpr::empty_interface());
    assert_eq!(
        publish.results[0].ty,
        TypeExpr::chan(mockgen_ir::ChanDir::Send, TypeExpr::empty_interface())
    );

    let TypeExpr::Struct { fields } = &snapshot.results[0].ty else {
        panic!("expected a struct result");
    };
    let names: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.embedded)).collect();
    assert_eq!(names, [("Event", true), ("Count", false), ("Total", false)]);
}

#[test]
fn test_function_type() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "web/handler.go",
        "package web

type Handler func(path string, args ...interface{}) (int, error)
",
    );

    let iface = resolve(tmp.path(), "web/handler.go", "Handler");
    assert_eq!(iface.kind, InterfaceKind::Function);
    assert_eq!(iface.qualified_name(), "web.Handler");
    let method = &iface.methods[0];
    assert_eq!(method.name, FUNCTION_METHOD);
    assert!(method.variadic);
    assert_eq!(
        method.params[1].ty,
        TypeExpr::slice(TypeExpr::empty_interface())
    );
    assert_eq!(method.results[1].ty, TypeExpr::error());
}

#[test]
fn test_defined_interface_type_follows_declaration() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "svc/svc.go",
        "package svc

type base interface {
	Ping() error
}

type Service base
",
    );

    let iface = resolve(tmp.path(), "svc/svc.go", "Service");
    assert_eq!(iface.name, "Service");
    assert_eq!(method_names(&iface), ["Ping"]);
}

#[test]
fn test_type_parameters_are_rejected() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "generic/generic.go",
        "package generic

type Number interface {
	~int | ~float64
}

type Repo[T any] interface {
	Get(id int) T
}

type Numbers interface {
	Number
	Sum() int
}

type Cache interface {
	Get() Repo[int]
}
",
    );

    for name in ["Number", "Repo", "Numbers", "Cache"] {
        let err = resolve_err(tmp.path(), "generic/generic.go", name);
        assert_eq!(err.kind(), ErrorKind::Resolution, "{name}");
    }
    let err = resolve_err(tmp.path(), "generic/generic.go", "Repo");
    assert!(err.to_string().contains("generic"));
}

#[test]
fn test_missing_and_unmockable_types() {
    let tmp = module_tree();

    let err = resolve_err(tmp.path(), "test/inputnew/example/types.go", "Missing");
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(err.to_string().contains("'Missing' not found"));

    let err = resolve_err(tmp.path(), "test/inputnew/model/model.go", "StructA");
    assert!(err.to_string().contains("neither an interface nor a function type"));

    let err = resolve_err(tmp.path(), "test/inputnew/example/nope.go", "Exampler");
    assert_eq!(err.kind(), ErrorKind::Filesystem);
}

#[test]
fn test_syntax_errors() {
    let tmp = module_tree();
    write(
        tmp.path(),
        "test/inputnew/example/broken.go",
        "package example\n\ntype Broken interface {\n\tMethod(\n",
    );

    let err = resolve_err(tmp.path(), "test/inputnew/example/broken.go", "Broken");
    assert_eq!(err.kind(), ErrorKind::Resolution);

    // Other files of the package still resolve.
    let iface = resolve(tmp.path(), "test/inputnew/example/types.go", "Exampler");
    assert_eq!(iface.methods.len(), 3);

    // A name only a broken file could declare reports the syntax error.
    let err = resolve_err(tmp.path(), "test/inputnew/example/types.go", "Broken");
    assert!(matches!(*err, mockgen_core::Error::Syntax { .. }));
}

#[test]
fn test_without_go_mod_uses_directory() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "api/api.go",
        "package api\n\ntype Pinger interface {\n\tPing() bool\n}\n",
    );

    let iface = resolve(tmp.path(), "api/api.go", "Pinger");
    let dir = fs::canonicalize(tmp.path().join("api")).unwrap();
    assert_eq!(iface.namespace.path, dir.display().to_string());
    assert_eq!(iface.namespace.name, "api");
}
