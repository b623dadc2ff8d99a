//! Static type information.
//!
//! Every reflectable type exposes a `&'static` [`TypeInfo`] through
//! [`Typed`]. It records the type's identity, the shape of its contents
//! and how to construct a fresh instance of it, which is everything the
//! evaluator needs to walk or build an object graph.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, TypeInfoCell};
pub use type_info::{KindInfo, MapInfo, OptionalInfo, ReflectKind, SequenceInfo, StructInfo, TypeInfo};
pub use typed::{DynamicTyped, Typed};
