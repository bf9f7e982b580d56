//! C-ABI backend for gentool.
//!
//! Every class becomes an opaque handle type plus free functions that
//! forward to the C++ class; enums become plain C enums.

mod backend;
mod surface;

pub mod files;

pub use backend::CBackend;
pub use surface::{CFunction, Param, Surface};
