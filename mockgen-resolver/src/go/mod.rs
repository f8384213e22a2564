//! Interface resolution from Go sources.

pub mod ast;
pub mod lexer;
pub mod module;
pub mod package;
pub mod parser;
mod resolve;

pub use package::SearchPaths;
pub use resolve::GoResolver;
