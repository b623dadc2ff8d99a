//! Validated, cached member metadata.
//!
//! The raw declarations of a struct are turned into a [`TypeMetadata`]
//! the first time the struct is walked:
//!
//! - accessor names are split into a prefix and a property name,
//!   `is` accessors must read a `bool`;
//! - getters and setters are paired, and a pair that disagrees on its
//!   value type or on taking an index is dropped;
//! - fields are indexed by name and consulted only for names no
//!   property claims.

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod metadata;
mod naming;

// -----------------------------------------------------------------------------
// Exports

pub use cache::describe;
pub use metadata::{FieldDescriptor, PropertyDescriptor, TypeMetadata};

pub(crate) use cache::MetadataCell;
