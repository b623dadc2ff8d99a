//! The [`Reflect`] trait and the kind specific views over it.

// -----------------------------------------------------------------------------
// Modules

mod kinds;
mod reflect;

// -----------------------------------------------------------------------------
// Exports

pub use kinds::{Array, List, Map, Optional, ReflectMut, ReflectRef};
pub use reflect::Reflect;
