//! Report data structures for commands.
//!
//! Operations build reports, commands render them to an Output target.

mod check;
mod document;
mod generate;
mod normalize;
mod output;

pub use check::CheckReport;
pub use document::DocumentReport;
pub use generate::{GenerateReport, GenerationResult, PreviewFile, PreviewResult, WrittenResult};
pub use normalize::NormalizeReport;
#[cfg(test)]
pub use output::RecordedOutput;
pub use output::{Report, TerminalOutput};
