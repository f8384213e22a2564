//! Indentation unit for generated code.

/// Text written once per indentation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(&'static str);

impl Indent {
    /// Tab indentation (gofmt style).
    pub const GO: Self = Self("\t");

    /// The text of one indentation level.
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::GO
    }
}
