//! Merging regenerated mocks into existing mock files.
//!
//! A mock file is a preamble (package clause, imports and the mock struct)
//! followed by one block per method, each closed by a `}` on its own line.
//! Blocks whose name and parameter list are unchanged keep their existing
//! text; the rest come from the fresh generation.

mod combine;
mod extract;

pub use combine::{MergeResult, combine, merge};
pub use extract::{ExtractedMock, FunctionBlock, extract, struct_name};
