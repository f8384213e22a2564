//! Parameter and result planning for mock methods.

use mockgen_codegen::generation::NamespaceBindings;
use mockgen_core::{Error, Result};
use mockgen_ir::{ParamDescriptor, TypeExpr};

use crate::type_renderer::render_type;

/// Identifiers declared by generated method bodies.
pub const RESERVED_NAMES: &[&str] = &["m", "args", "_va", "_ca", "_i"];

/// Rendered view of a parameter or result tuple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamList {
    /// Names used in the generated signature.
    pub names: Vec<String>,
    /// Rendered types; a variadic tail starts with `...`.
    pub types: Vec<String>,
    /// `name type` pairs.
    pub params: Vec<String>,
    pub nilable: Vec<bool>,
    /// The last entry is a variadic tail.
    pub variadic: bool,
}

impl ParamList {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Element type of the variadic tail, without the `...` marker.
    pub fn variadic_elem(&self) -> Option<&str> {
        if !self.variadic {
            return None;
        }
        self.types.last().and_then(|t| t.strip_prefix("..."))
    }
}

/// Plan the parameter (or result) tuple of a method.
///
/// `own_package` is the package name of the mocked interface. Names that
/// are empty, reserved, or collide with it or with a bound alias become
/// `_a<index>`.
pub fn plan(
    list: &[ParamDescriptor],
    variadic: bool,
    bindings: &mut NamespaceBindings,
    own_package: &str,
) -> Result<ParamList> {
    let mut plan = ParamList::default();

    for (i, param) in list.iter().enumerate() {
        let mut ty = render_type(&param.ty, bindings)?;

        if variadic && i + 1 == list.len() {
            let TypeExpr::Slice { elem } = &param.ty else {
                return Err(Error::construction(format!(
                    "variadic parameter '{}' is not a slice",
                    param.name
                )));
            };
            ty = format!("...{}", render_type(elem, bindings)?);
            plan.variadic = true;
        }

        let name = if collides(&param.name, bindings, own_package) {
            let synthesized = format!("_a{i}");
            if !param.name.is_empty() {
                tracing::debug!(declared = %param.name, %synthesized, "renamed colliding parameter");
            }
            synthesized
        } else {
            param.name.clone()
        };

        plan.params.push(format!("{name} {ty}"));
        plan.names.push(name);
        plan.types.push(ty);
        plan.nilable.push(param.nilable);
    }

    Ok(plan)
}

fn collides(name: &str, bindings: &NamespaceBindings, own_package: &str) -> bool {
    name.is_empty()
        || name == "_"
        || name == own_package
        || RESERVED_NAMES.contains(&name)
        || bindings.contains_alias(name)
}
