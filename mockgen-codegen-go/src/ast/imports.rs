//! Go import declarations.

use mockgen_codegen::{
    builder::{CodeFragment, Renderable},
    generation::{ImportCollector, ImportSpec},
};

/// Whether an import path belongs to the standard library (no dot in the
/// first path element).
pub fn is_std_import(path: &str) -> bool {
    path.split('/').next().is_some_and(|first| !first.contains('.'))
}

fn spec_line(spec: &ImportSpec) -> String {
    match &spec.alias {
        Some(alias) => format!("{} \"{}\"", alias, spec.path),
        None => format!("\"{}\"", spec.path),
    }
}

/// A parenthesized import block: standard library first, then everything
/// else, groups separated by a blank line and sorted by path.
#[derive(Debug, Clone, Default)]
pub struct ImportBlock {
    imports: ImportCollector,
}

impl ImportBlock {
    pub fn new(imports: ImportCollector) -> Self {
        Self { imports }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}

impl Renderable for ImportBlock {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        if self.imports.is_empty() {
            return Vec::new();
        }

        let mut body = Vec::new();
        for (i, group) in self.imports.groups(is_std_import).iter().enumerate() {
            if i > 0 {
                body.push(CodeFragment::blank());
            }
            body.extend(group.iter().map(|spec| CodeFragment::line(spec_line(spec))));
        }
        vec![CodeFragment::block("import (", body, Some(")".to_string()))]
    }
}
