//! C++ backend for gentool.
//!
//! Classes become `psm::` classes split into a declaration header and a
//! `.gen.cpp` source; enums become scoped enums.

mod backend;
mod layout;

pub mod files;

pub use backend::CxxBackend;
pub use layout::{ClassLayout, Group, Member};
