//! Go method builder.

use mockgen_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// Builder for a Go method with a pointer receiver.
#[derive(Debug, Clone)]
pub struct Method {
    receiver: String,
    receiver_type: String,
    name: String,
    doc: Option<String>,
    params: Vec<String>,
    results: Vec<String>,
    body: Vec<CodeFragment>,
}

impl Method {
    /// Method `name` on `*receiver_type`, with receiver variable `receiver`.
    pub fn new(
        receiver: impl Into<String>,
        receiver_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            receiver: receiver.into(),
            receiver_type: receiver_type.into(),
            name: name.into(),
            doc: None,
            params: Vec::new(),
            results: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a `name type` parameter.
    pub fn param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.params.extend(params.into_iter().map(Into::into));
        self
    }

    /// Add an unnamed result type.
    pub fn result(mut self, ty: impl Into<String>) -> Self {
        self.results.push(ty.into());
        self
    }

    pub fn results(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.results.extend(types.into_iter().map(Into::into));
        self
    }

    /// Add a single body line.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(CodeFragment::line(line));
        self
    }

    /// Add body fragments.
    pub fn body(mut self, fragments: impl IntoIterator<Item = CodeFragment>) -> Self {
        self.body.extend(fragments);
        self
    }

    /// `func (m *T) Name(params) results {`
    fn header(&self) -> String {
        let results = match self.results.as_slice() {
            [] => String::new(),
            [single] => format!("{single} "),
            many => format!("({}) ", many.join(", ")),
        };
        format!(
            "func ({} *{}) {}({}) {}{{",
            self.receiver,
            self.receiver_type,
            self.name,
            self.params.join(", "),
            results
        )
    }

    /// Build the method as a string.
    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::go();
        builder.emit(self);
        builder.build()
    }
}

impl Renderable for Method {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        if let Some(doc) = &self.doc {
            fragments.push(CodeFragment::comment(doc));
        }
        fragments.push(CodeFragment::block(
            self.header(),
            self.body.clone(),
            Some("}".to_string()),
        ));
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_params_no_results() {
        let f = Method::new("m", "Mock", "Close").body_line("m.Called()").build();
        assert_eq!(f, "func (m *Mock) Close() {\n\tm.Called()\n}\n");
    }

    #[test]
    fn test_single_result_is_bare() {
        let f = Method::new("m", "Mock", "Name").result("string").build();
        assert!(f.starts_with("func (m *Mock) Name() string {\n"));
    }

    #[test]
    fn test_multiple_results_are_parenthesized() {
        let f = Method::new("m", "Mock", "Find")
            .params(["id int", "name string"])
            .results(["*model.User", "error"])
            .build();
        assert!(f.starts_with("func (m *Mock) Find(id int, name string) (*model.User, error) {\n"));
    }

    #[test]
    fn test_doc_comment() {
        let f = Method::new("m", "Mock", "Run")
            .doc("Run is a mock implementation of pkg.Runner#Run.")
            .build();
        assert!(f.starts_with("// Run is a mock implementation of pkg.Runner#Run.\nfunc"));
    }
}
