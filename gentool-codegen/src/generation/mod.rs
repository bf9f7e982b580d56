//! Generated output management.
//!
//! - [`IncludeCollector`] - Include tracking and deduplication
//! - [`Emitted`] - Header/source pair produced for one entity

mod includes;
mod output;

pub use includes::{IncludeCollector, IncludeGroup};
pub use output::{Emitted, banner};
