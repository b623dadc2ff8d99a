//! Property expressions and the walk over an object graph.
//!
//! An expression such as `user.addresses['home'].city` is tokenized
//! into [`Atom`]s once. Each atom is then resolved, against the value
//! reached so far, to one of four accessors:
//!
//! - a named member of a struct, read through its getter or field;
//! - an indexed member, whose getter and setter take the next atom as
//!   an index argument;
//! - an element of a list or fixed-size array;
//! - an entry of a map, keyed by the atom converted to the key type.
//!
//! Reads stop at the first null. Writes create missing intermediates on
//! the way down and grow sequences to fit the index written.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod context;
mod expression;
mod path;

// -----------------------------------------------------------------------------
// Exports

pub use expression::PropertyExpression;
pub use path::Atom;

pub(crate) use context::{EvaluationContext, Payload};
