//! Go mock generation for mockgen.
//!
//! [`MockGenerator`] turns an interface descriptor into the source of a
//! testify-style mock; [`merge`] folds a regenerated mock into an existing
//! file; [`format`] validates and normalizes the result.

mod go_file;

pub mod ast;
pub mod body;
pub mod format;
pub mod generator;
pub mod merge;
pub mod signature;
pub mod type_renderer;

pub use format::{BuiltinFormatter, CommandFormatter, SourceFormatter, formatter_for};
pub use generator::{MockGenerator, MockOptions};
pub use go_file::GoFile;
pub use merge::{MergeResult, merge};
pub use signature::{ParamList, plan};
pub use type_renderer::render_type;
