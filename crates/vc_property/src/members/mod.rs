//! Raw member declarations.
//!
//! A struct declares its members through a [`MemberTable`]: the fields
//! `#[derive(Reflect)]` generates, and any accessor methods registered
//! by hand. The declarations are validated and indexed by
//! [`meta`](crate::meta) the first time the struct is walked.

// -----------------------------------------------------------------------------
// Modules

mod table;
mod tags;

// -----------------------------------------------------------------------------
// Exports

pub use table::MemberTable;
pub use tags::Tags;

pub(crate) use table::{FieldDecl, GetFn, Getter, IndexedGetFn, IndexedSetFn, SetFn};
pub(crate) use table::{MemberDeclarations, MethodBody, MethodDecl, Setter};
