//! Report data structures for commands.
//!
//! Operations build reports, commands render them to an Output target.

mod generate;
mod output;
mod update;

pub use generate::{GenerateReport, GenerationResult};
pub use output::{Report, TerminalOutput};
pub use update::UpdateReport;
