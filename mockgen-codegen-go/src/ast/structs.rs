//! Go struct type declarations.

use mockgen_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// A `type Name struct { ... }` declaration.
#[derive(Debug, Clone)]
pub struct Struct {
    name: String,
    doc: Option<String>,
    /// Field lines: `name Type` or an embedded `Type`.
    fields: Vec<String>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            fields: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a named field.
    pub fn field(mut self, name: impl AsRef<str>, ty: impl AsRef<str>) -> Self {
        self.fields.push(format!("{} {}", name.as_ref(), ty.as_ref()));
        self
    }

    /// Add an embedded field.
    pub fn embed(mut self, ty: impl Into<String>) -> Self {
        self.fields.push(ty.into());
        self
    }

    /// Build the declaration as a string.
    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::go();
        builder.emit(self);
        builder.build()
    }
}

impl Renderable for Struct {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::comment(doc));
        }
        if self.fields.is_empty() {
            fragments.push(CodeFragment::line(format!("type {} struct{{}}", self.name)));
        } else {
            fragments.push(CodeFragment::block(
                format!("type {} struct {{", self.name),
                self.fields.iter().map(CodeFragment::line).collect(),
                Some("}".to_string()),
            ));
        }
        fragments
    }
}
