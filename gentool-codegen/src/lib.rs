//! Shared emission utilities for gentool backends.
//!
//! # Module Organization
//!
//! - [`builder`] - Indented code building (CodeBuilder, Indent)
//! - [`generation`] - Output management (IncludeCollector, Emitted, banner)
//! - [`language`] - Backend trait and type spelling
//! - [`snippets`] - Recurring C++ statements

pub mod builder;
pub mod generation;
pub mod language;
pub mod snippets;

pub use builder::{CodeBuilder, Indent};
pub use generation::{Emitted, IncludeCollector, IncludeGroup, banner};
pub use language::{Backend, SpellError, TypeSpeller, UseSite};
