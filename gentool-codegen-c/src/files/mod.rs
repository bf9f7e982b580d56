//! One renderer per generated file.

mod class_header;
mod class_source;
mod enum_header;

pub use class_header::ClassHeader;
pub use class_source::ClassSource;
pub use enum_header::EnumHeader;
