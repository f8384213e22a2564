//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from generating a mock.
#[derive(Debug)]
pub struct GenerateReport {
    /// Qualified name of the mocked type (e.g., "example.Exampler").
    pub interface: String,
    pub struct_name: String,
    /// Path of the mock file.
    pub path: PathBuf,
    /// Mocked methods in file order.
    pub methods: Vec<String>,
    pub result: GenerationResult,
}

/// Whether a file was written or only previewed.
#[derive(Debug)]
pub enum GenerationResult {
    Written,
    /// Dry run, with the content that would have been written.
    Preview(String),
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        let path = self.path.display().to_string();
        if let GenerationResult::Preview(content) = &self.result {
            out.divider(&path);
            out.preformatted(content.trim_end());
            out.divider("Summary");
        }

        out.key_value("Interface", &self.interface);
        out.key_value("Mock", &self.struct_name);
        out.newline();
        out.section(&format!("Methods ({})", self.methods.len()));
        for method in &self.methods {
            out.list_item(method);
        }
        out.newline();

        match self.result {
            GenerationResult::Written => out.key_value("Generated", &path),
            GenerationResult::Preview(_) => out.key_value("Would generate", &path),
        }
    }
}
