//! Go AST builders for generating methods, structs and import blocks.
//!
//! These provide a high-level API for constructing Go syntax,
//! which can then be rendered via CodeBuilder.

mod funcs;
mod imports;
mod structs;

pub use funcs::Method;
pub use imports::{ImportBlock, is_std_import};
pub use structs::Struct;
