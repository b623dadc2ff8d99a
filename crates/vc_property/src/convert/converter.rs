use alloc::sync::Arc;
use core::any::type_name;
use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use thiserror::Error;

use crate::Reflect;
use crate::info::TypeInfo;

/// A converter's reason for rejecting its input.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConvertError(String);

impl ConvertError {
    pub fn new(reason: impl fmt::Display) -> Self {
        Self(reason.to_string())
    }
}

/// Converts between strings and values of one type.
///
/// # Examples
///
/// ```
/// use vc_property::Reflect;
/// use vc_property::convert::{ConvertError, Converter};
/// use vc_property::info::{TypeInfo, Typed};
///
/// struct Upper;
///
/// impl Converter for Upper {
///     fn parse(&self, _: &'static TypeInfo, raw: &str) -> Result<Box<dyn Reflect>, ConvertError> {
///         Ok(Box::new(raw.to_uppercase()))
///     }
///
///     fn format(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
///         value
///             .downcast_ref::<String>()
///             .map(|s| s.to_lowercase())
///             .ok_or_else(|| ConvertError::new("not a string"))
///     }
/// }
///
/// let value = Upper.parse(String::type_info(), "abc").unwrap();
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "ABC");
/// ```
pub trait Converter: Send + Sync + 'static {
    /// Parses `raw` into a value of type `target`.
    fn parse(&self, target: &'static TypeInfo, raw: &str) -> Result<Box<dyn Reflect>, ConvertError>;

    /// Renders `value` as a string that [`Converter::parse`] accepts back.
    fn format(&self, value: &dyn Reflect) -> Result<String, ConvertError>;
}

/// Member tag that overrides the converter for that member.
///
/// Takes precedence over the registry. There is no fallback: if the
/// override fails, the conversion fails.
#[derive(Clone)]
pub struct ConvertWith(Arc<dyn Converter>);

impl ConvertWith {
    pub fn new(converter: impl Converter) -> Self {
        Self(Arc::new(converter))
    }

    #[inline]
    pub fn converter(&self) -> &dyn Converter {
        &*self.0
    }
}

impl fmt::Debug for ConvertWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConvertWith(..)")
    }
}

// -----------------------------------------------------------------------------
// Built-in converters

/// Converts through [`FromStr`] and [`Display`](fmt::Display).
pub struct FromStrConverter<T> {
    trim: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConverter<T> {
    /// A converter that ignores surrounding whitespace.
    pub const fn new() -> Self {
        Self {
            trim: true,
            _marker: PhantomData,
        }
    }

    /// A converter that hands the raw text over unchanged.
    pub const fn untrimmed() -> Self {
        Self {
            trim: false,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Converter for FromStrConverter<T>
where
    T: Reflect + FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    fn parse(&self, _: &'static TypeInfo, raw: &str) -> Result<Box<dyn Reflect>, ConvertError> {
        let raw = if self.trim { raw.trim() } else { raw };
        match raw.parse::<T>() {
            Ok(value) => Ok(Box::new(value)),
            Err(err) => Err(ConvertError::new(err)),
        }
    }

    fn format(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
        match value.downcast_ref::<T>() {
            Some(value) => Ok(value.to_string()),
            None => Err(ConvertError::new(format_args!(
                "expected `{}`, found `{}`",
                type_name::<T>(),
                value.type_path(),
            ))),
        }
    }
}

/// Identity converter for `String`.
pub struct StringConverter;

impl Converter for StringConverter {
    fn parse(&self, _: &'static TypeInfo, raw: &str) -> Result<Box<dyn Reflect>, ConvertError> {
        Ok(Box::new(raw.to_owned()))
    }

    fn format(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
        match value.downcast_ref::<String>() {
            Some(value) => Ok(value.clone()),
            None => Err(ConvertError::new(format_args!(
                "expected `String`, found `{}`",
                value.type_path(),
            ))),
        }
    }
}

/// Lenient boolean converter.
///
/// Accepts `true`/`false`, `yes`/`no`, `on`/`off`, `y`/`n` and `1`/`0`,
/// ignoring case and surrounding whitespace.
pub struct BoolConverter;

impl Converter for BoolConverter {
    fn parse(&self, _: &'static TypeInfo, raw: &str) -> Result<Box<dyn Reflect>, ConvertError> {
        let value = match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "y" | "1" => true,
            "false" | "no" | "off" | "n" | "0" => false,
            other => return Err(ConvertError::new(format_args!("`{other}` is not a boolean"))),
        };
        Ok(Box::new(value))
    }

    fn format(&self, value: &dyn Reflect) -> Result<String, ConvertError> {
        match value.downcast_ref::<bool>() {
            Some(value) => Ok(value.to_string()),
            None => Err(ConvertError::new(format_args!(
                "expected `bool`, found `{}`",
                value.type_path(),
            ))),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{BoolConverter, Converter, FromStrConverter};
    use crate::info::Typed;

    #[test]
    fn from_str_round_trip() {
        let converter = FromStrConverter::<i64>::new();
        let value = converter.parse(i64::type_info(), " -42 ").unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&-42));
        assert_eq!(converter.format(&*value).unwrap(), "-42");

        let err = converter.parse(i64::type_info(), "4x").unwrap_err();
        assert_eq!(err.to_string(), "invalid digit found in string");
    }

    #[test]
    fn untrimmed_keeps_whitespace() {
        let converter = FromStrConverter::<char>::untrimmed();
        let value = converter.parse(char::type_info(), " ").unwrap();
        assert_eq!(value.downcast_ref::<char>(), Some(&' '));
    }

    #[test]
    fn lenient_booleans() {
        for (raw, expected) in [("on", true), ("No", false), (" 1 ", true), ("FALSE", false)] {
            let value = BoolConverter.parse(bool::type_info(), raw).unwrap();
            assert_eq!(value.downcast_ref::<bool>(), Some(&expected), "{raw}");
        }
        assert!(BoolConverter.parse(bool::type_info(), "maybe").is_err());
        assert!(BoolConverter.format(&1_u8).is_err());
    }
}
