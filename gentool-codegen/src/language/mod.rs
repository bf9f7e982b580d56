//! Language-specific abstractions.
//!
//! - [`Backend`] - Trait implemented by each emitter
//! - [`TypeSpeller`] - Maps type tags to language type strings

mod spell;
mod traits;

pub use spell::{
    CXX_NAMESPACE, SpellError, TypeSpeller, UseSite, c_enum_type, c_ref_type, c_scalar, c_stem, cxx_scalar,
};
pub use traits::Backend;
