//! String conversion and value coercion.
//!
//! Raw strings are turned into typed values by a [`Converter`], found
//! either through a member's [`ConvertWith`] tag or through the
//! [`ConverterRegistry`], keyed by the destination type.

// -----------------------------------------------------------------------------
// Modules

mod converter;
mod registry;
mod values;

// -----------------------------------------------------------------------------
// Exports

pub use converter::{BoolConverter, ConvertError, ConvertWith, Converter};
pub use converter::{FromStrConverter, StringConverter};
pub use registry::ConverterRegistry;

pub(crate) use values::{coerce, prepare};
