//! Update command report data structures.

use std::path::PathBuf;

use super::{
    generate::GenerationResult,
    output::{Output, Report},
};

/// Report data from merging a regenerated mock into an existing one.
#[derive(Debug)]
pub struct UpdateReport {
    pub interface: String,
    /// Struct name read from the existing mock.
    pub struct_name: String,
    pub path: PathBuf,
    /// Methods whose existing text was kept.
    pub preserved: Vec<String>,
    /// Methods whose signature changed and were generated again.
    pub regenerated: Vec<String>,
    /// Methods new to the mock.
    pub added: Vec<String>,
    /// Methods no longer part of the interface.
    pub removed: Vec<String>,
    pub result: GenerationResult,
}

impl UpdateReport {
    /// Whether the merge changed any method.
    pub fn has_changes(&self) -> bool {
        !self.regenerated.is_empty() || !self.added.is_empty() || !self.removed.is_empty()
    }
}

impl Report for UpdateReport {
    fn render(&self, out: &mut dyn Output) {
        let path = self.path.display().to_string();
        if let GenerationResult::Preview(content) = &self.result {
            out.divider(&path);
            out.preformatted(content.trim_end());
            out.divider("Summary");
        }

        out.key_value("Interface", &self.interface);
        out.key_value("Mock", &self.struct_name);

        if !self.has_changes() {
            out.newline();
            out.preformatted("Mock is up to date.");
            return;
        }

        if !self.preserved.is_empty() {
            out.newline();
            out.section("Kept");
            for name in &self.preserved {
                out.list_item(name);
            }
        }
        if !self.regenerated.is_empty() {
            out.newline();
            out.section("Regenerated");
            for name in &self.regenerated {
                out.list_item(name);
            }
        }
        if !self.added.is_empty() {
            out.newline();
            out.section("Added");
            for name in &self.added {
                out.added_item(name);
            }
        }
        if !self.removed.is_empty() {
            out.newline();
            out.section("Removed");
            for name in &self.removed {
                out.removed_item(name);
            }
        }

        out.newline();
        match self.result {
            GenerationResult::Written => out.key_value("Updated", &path),
            GenerationResult::Preview(_) => out.key_value("Would update", &path),
        }
    }
}
