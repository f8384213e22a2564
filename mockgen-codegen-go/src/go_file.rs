//! GoFile abstraction for structured Go file generation.
//!
//! Provides a high-level API for generating Go files with a package
//! clause, an organized import block and body declarations.

use mockgen_codegen::{
    builder::{CodeBuilder, CodeFragment, Indent, Renderable},
    generation::ImportCollector,
};

use crate::ast::ImportBlock;

/// A structured representation of a Go file.
///
/// # Example
///
/// ```
/// use mockgen_codegen_go::{GoFile, ast::Struct};
///
/// let code = GoFile::new("examplemock")
///     .import("github.com/stretchr/testify/mock", "mock")
///     .add(Struct::new("TestMock").embed("mock.Mock"))
///     .render();
///
/// assert!(code.starts_with("package examplemock\n\nimport (\n"));
/// ```
pub struct GoFile {
    package: String,
    imports: ImportCollector,
    body: Vec<Vec<CodeFragment>>,
}

impl GoFile {
    /// Create a new file in `package`.
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            imports: ImportCollector::new(),
            body: Vec::new(),
        }
    }

    /// Import `path`, referenced in the body as `name`.
    pub fn import(mut self, path: &str, name: &str) -> Self {
        self.imports.add(path, name);
        self
    }

    /// Replace the imports.
    pub fn imports(mut self, imports: ImportCollector) -> Self {
        self.imports = imports;
        self
    }

    /// Add a body declaration (any Renderable).
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: Renderable>(mut self, node: R) -> Self {
        self.body.push(node.to_fragments());
        self
    }

    /// Add multiple body declarations.
    pub fn add_all<R: Renderable>(mut self, nodes: impl IntoIterator<Item = R>) -> Self {
        for node in nodes {
            self.body.push(node.to_fragments());
        }
        self
    }

    /// Render the file with tab indentation.
    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::new(Indent::GO);

        builder.push_line(&format!("package {}", self.package));

        if !self.imports.is_empty() {
            builder.push_blank();
            builder.emit(&ImportBlock::new(self.imports.clone()));
        }

        // Declarations, one blank line apart
        for fragments in &self.body {
            builder.push_blank();
            for fragment in fragments {
                builder.apply_fragment(fragment.clone());
            }
        }

        builder.build()
    }
}
