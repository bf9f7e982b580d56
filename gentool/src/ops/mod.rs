//! Core operations.
//!
//! This module contains the business logic for gentool commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod documents;
pub mod generate;
pub mod normalize;

pub use check::check;
pub use generate::generate;
pub use normalize::normalize;
