#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::vc_property`, which must also resolve
// inside this crate and its unit tests.
extern crate self as vc_property;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod evaluator;
mod utils;

pub mod access;
pub mod convert;
pub mod impls;
pub mod info;
pub mod members;
pub mod meta;
pub mod reflection;

#[cfg(test)]
mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports {
    pub use alloc::boxed::Box;
}

pub use access::{Atom, PropertyExpression};
pub use error::{PropertyError, Result};
pub use evaluator::{Evaluator, get_string, get_tag, get_value, member_names, set_strings, set_value};
pub use reflection::Reflect;
pub use vc_property_derive::Reflect;
