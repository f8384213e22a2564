//! Mock method bodies: the recording call and typed result reconstruction.

use mockgen_codegen::builder::CodeFragment;

use crate::{signature::ParamList, type_renderer::EMPTY_INTERFACE};

/// Typed accessor of the recorded arguments for a scalar result type.
fn accessor(ty: &str) -> Option<&'static str> {
    match ty {
        "string" => Some("String"),
        "error" => Some("Error"),
        "int" => Some("Int"),
        "bool" => Some("Bool"),
        _ => None,
    }
}

/// Positions whose value may be a configured `nil`, excluding errors.
fn guarded_positions(results: &ParamList) -> Vec<usize> {
    (0..results.len())
        .filter(|&i| results.nilable[i] && results.types[i] != "error")
        .collect()
}

/// The recording call and the statements preparing its arguments.
///
/// A variadic tail is spread into the call one value per argument; tails
/// of a concrete element type are first copied into `[]interface{}`.
pub fn called_invocation(params: &ParamList) -> (Vec<CodeFragment>, String) {
    let Some(elem) = params.variadic_elem() else {
        return (Vec::new(), format!("m.Called({})", params.names.join(", ")));
    };

    let mut setup = Vec::new();
    let (fixed, tail) = params.names.split_at(params.names.len() - 1);
    let tail = &tail[0];

    let spread = if elem == EMPTY_INTERFACE {
        tail.as_str()
    } else {
        setup.push(CodeFragment::line(format!(
            "_va := make([]interface{{}}, len({tail}))"
        )));
        setup.push(CodeFragment::block(
            format!("for _i := range {tail} {{"),
            vec![CodeFragment::line(format!("_va[_i] = {tail}[_i]"))],
            Some("}".to_string()),
        ));
        "_va"
    };

    setup.push(CodeFragment::line("var _ca []interface{}"));
    if !fixed.is_empty() {
        setup.push(CodeFragment::line(format!(
            "_ca = append(_ca, {})",
            fixed.join(", ")
        )));
    }
    setup.push(CodeFragment::line(format!("_ca = append(_ca, {spread}...)")));

    (setup, "m.Called(_ca...)".to_string())
}

/// Comma-separated result expressions read from `args`.
///
/// With `absent`, nilable non-error positions are `nil` instead of a type
/// assertion that would panic on a missing value.
pub fn representation(results: &ParamList, absent: bool) -> String {
    results
        .types
        .iter()
        .enumerate()
        .map(|(i, ty)| match accessor(ty) {
            Some(method) => format!("args.{method}({i})"),
            None if absent && results.nilable[i] => "nil".to_string(),
            None => format!("args.Get({i}).({ty})"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Body statements of a mock method.
pub fn method_body(params: &ParamList, results: &ParamList) -> Vec<CodeFragment> {
    let (mut body, called) = called_invocation(params);

    if results.is_empty() {
        body.push(CodeFragment::line(called));
        return body;
    }

    body.push(CodeFragment::line(format!("args := {called}")));
    body.push(CodeFragment::blank());

    let guarded = guarded_positions(results);
    if guarded.is_empty() {
        body.push(CodeFragment::line(format!(
            "return {}",
            representation(results, false)
        )));
        return body;
    }

    let condition = guarded
        .iter()
        .map(|i| format!("args.Get({i}) != nil"))
        .collect::<Vec<_>>()
        .join(" && ");
    body.push(CodeFragment::block(
        format!("if {condition} {{"),
        vec![CodeFragment::line(format!(
            "return {}",
            representation(results, false)
        ))],
        Some("}".to_string()),
    ));
    body.push(CodeFragment::blank());
    body.push(CodeFragment::line(format!(
        "return {}",
        representation(results, true)
    )));
    body
}
