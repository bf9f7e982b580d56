//! Core building blocks for the gentool interface compiler.
//!
//! This crate holds the parts that know nothing about schema documents:
//! the naming engine, the type-tag model and idempotent file writing.

mod file;
mod language;
mod naming;
mod type_tag;
mod utils;

// File operations
pub use file::{File, WriteResult};
// Naming engine
pub use language::{Language, NameRole, WRAP_PLACEHOLDER, language_name, wrap};
pub use naming::{
    NameStyle, NamingError, SEGMENT_DELIMITER, segments, split_canonical, styled_name,
    validate_identifier,
};
// Type tags
pub use type_tag::{Borrow, Element, EntityKind, Scalar, TypeLookup, TypeTag, TypeTagError};
// Expression templates
pub use utils::{PLACEHOLDER, substitute};
