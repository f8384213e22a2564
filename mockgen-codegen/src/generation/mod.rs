//! Generation state shared by language generators.
//!
//! - [`NamespaceBindings`] - Collision-free aliases for referenced namespaces
//! - [`ImportCollector`] - Import tracking, deduplication and grouping

mod imports;
mod namespaces;

pub use imports::{ImportCollector, ImportSpec};
pub use namespaces::NamespaceBindings;
