//! Go source text for type descriptors.

use mockgen_codegen::generation::NamespaceBindings;
use mockgen_core::{Error, Result};
use mockgen_ir::{ChanDir, Field, TypeExpr};

/// Canonical spelling of the empty interface.
pub const EMPTY_INTERFACE: &str = "interface{}";

/// Render `ty` as Go source, binding the namespace of every named type
/// it references.
///
/// Inline interfaces with methods cannot be mocked through and are a
/// construction error.
pub fn render_type(ty: &TypeExpr, bindings: &mut NamespaceBindings) -> Result<String> {
    Ok(match ty {
        TypeExpr::Named {
            name, namespace, ..
        } => match namespace {
            Some(ns) if !ns.is_entrypoint() => {
                format!("{}.{}", bindings.bind(&ns.path, &ns.name), name)
            }
            _ => name.clone(),
        },
        TypeExpr::Basic { name } => name.clone(),
        TypeExpr::Pointer { elem } => format!("*{}", render_type(elem, bindings)?),
        TypeExpr::Array { len, elem } => format!("[{}]{}", len, render_type(elem, bindings)?),
        TypeExpr::Slice { elem } => format!("[]{}", render_type(elem, bindings)?),
        TypeExpr::Func {
            params,
            results,
            variadic,
        } => render_func(params, results, *variadic, bindings)?,
        TypeExpr::Map { key, value } => format!(
            "map[{}]{}",
            render_type(key, bindings)?,
            render_type(value, bindings)?
        ),
        TypeExpr::Chan { dir, elem } => {
            let elem = render_type(elem, bindings)?;
            match dir {
                ChanDir::Both => format!("chan {elem}"),
                ChanDir::Recv => format!("<-chan {elem}"),
                ChanDir::Send => format!("chan<- {elem}"),
            }
        }
        TypeExpr::Struct { fields } => {
            let fields = fields
                .iter()
                .map(|field| render_field(field, bindings))
                .collect::<Result<Vec<_>>>()?;
            format!("struct{{{}}}", fields.join(";"))
        }
        TypeExpr::Interface { methods } => {
            if !methods.is_empty() {
                return Err(Error::construction(format!(
                    "inline interface with methods ({}) cannot be mocked",
                    methods.join(", ")
                )));
            }
            EMPTY_INTERFACE.to_string()
        }
    })
}

fn render_field(field: &Field, bindings: &mut NamespaceBindings) -> Result<String> {
    let ty = render_type(&field.ty, bindings)?;
    Ok(if field.embedded {
        ty
    } else {
        format!("{} {}", field.name, ty)
    })
}

fn render_func(
    params: &[TypeExpr],
    results: &[TypeExpr],
    variadic: bool,
    bindings: &mut NamespaceBindings,
) -> Result<String> {
    let mut rendered = Vec::with_capacity(params.len());
    for (i, param) in params.iter().enumerate() {
        if variadic && i + 1 == params.len() {
            let TypeExpr::Slice { elem } = param else {
                return Err(Error::construction(
                    "variadic function parameter is not a slice",
                ));
            };
            rendered.push(format!("...{}", render_type(elem, bindings)?));
        } else {
            rendered.push(render_type(param, bindings)?);
        }
    }
    let params = rendered.join(", ");

    Ok(match results {
        [] => format!("func({params})"),
        [single] => format!("func({params}) {}", render_type(single, bindings)?),
        _ => {
            let results = results
                .iter()
                .map(|r| render_type(r, bindings))
                .collect::<Result<Vec<_>>>()?;
            format!("func({params}) ({})", results.join(", "))
        }
    })
}
