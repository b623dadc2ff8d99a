use crate::Reflect;
use crate::convert::{ConvertWith, Converter, ConverterRegistry};
use crate::error::{PropertyError, Result};
use crate::info::{KindInfo, TypeInfo};
use crate::reflection::ReflectMut;

// -----------------------------------------------------------------------------
// Coercion

/// Fits `value` into a slot of type `target`.
///
/// Accepts a value of exactly that type, or the inner value of an
/// optional slot. Hands `value` back otherwise.
pub(crate) fn coerce(
    target: &'static TypeInfo,
    value: Box<dyn Reflect>,
) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    let actual = value.reflect_type_info().type_id();
    if actual == target.type_id() {
        return Ok(value);
    }
    match target.kind_info() {
        KindInfo::Optional(optional) if optional.inner().type_id() == actual => optional.wrap(value),
        _ => Err(value),
    }
}

/// Turns the value handed to a write into one a slot of type `target`
/// accepts.
///
/// `None` becomes the slot's null. A collection offered to a single
/// valued slot is unwrapped when it holds one element, written as null
/// when empty, and rejected when it holds more.
pub(crate) fn prepare(
    target: &'static TypeInfo,
    value: Option<Box<dyn Reflect>>,
    member: &str,
    expression: &str,
) -> Result<Box<dyn Reflect>> {
    let mismatch = |found: &'static str| PropertyError::TypeMismatch {
        expression: expression.into(),
        member: member.to_owned(),
        expected: target.type_path(),
        found,
    };

    let Some(value) = value else {
        return target.null_value().ok_or_else(|| mismatch("null"));
    };
    let mut value = match coerce(target, value) {
        Ok(value) => return Ok(value),
        Err(value) => value,
    };

    let found = value.type_path();
    let items = match value.reflect_mut() {
        ReflectMut::List(list) => list.drain(),
        ReflectMut::Array(array) => array.drain(),
        _ => return Err(mismatch(found)),
    };

    let count = items.len();
    let mut items = items.into_iter();
    match (items.next(), items.next()) {
        (None, _) => target.null_value().ok_or_else(|| mismatch("null")),
        (Some(item), None) => coerce(target, item).map_err(|item| mismatch(item.type_path())),
        (Some(_), Some(_)) => Err(PropertyError::Arity {
            expression: expression.into(),
            member: member.to_owned(),
            count,
        }),
    }
}

// -----------------------------------------------------------------------------
// String conversion

impl ConverterRegistry {
    /// Converts one raw string into a value of type `target`.
    ///
    /// Blank input for an optional target is null.
    pub(crate) fn parse_value(
        &self,
        target: &'static TypeInfo,
        raw: &str,
        with: Option<&ConvertWith>,
        expression: &str,
    ) -> Result<Box<dyn Reflect>> {
        if let KindInfo::Optional(optional) = target.kind_info() {
            if raw.trim().is_empty() {
                return target.null_value().ok_or_else(|| PropertyError::Instantiation {
                    expression: expression.into(),
                    type_path: target.type_path(),
                });
            }
            let inner = self.parse_value(optional.inner(), raw, with, expression)?;
            return optional.wrap(inner).map_err(|inner| PropertyError::TypeMismatch {
                expression: expression.into(),
                member: raw.to_owned(),
                expected: optional.inner().type_path(),
                found: inner.type_path(),
            });
        }

        let converter: &dyn Converter = match with {
            Some(with) => with.converter(),
            None if target.is::<String>() => return Ok(Box::new(raw.to_owned())),
            None => self.get(target).ok_or_else(|| PropertyError::NoConverterFound {
                expression: expression.into(),
                type_path: target.type_path(),
            })?,
        };

        let value = converter
            .parse(target, raw)
            .map_err(|err| PropertyError::Conversion {
                expression: expression.into(),
                type_path: target.type_path(),
                raw: raw.to_owned(),
                reason: err.to_string(),
            })?;
        coerce(target, value).map_err(|value| PropertyError::Conversion {
            expression: expression.into(),
            type_path: target.type_path(),
            raw: raw.to_owned(),
            reason: format!("converter produced `{}`", value.type_path()),
        })
    }

    /// Converts the raw strings bound to a member of type `target`.
    ///
    /// Sequences take every string as one element. Any other type takes
    /// at most one string; none at all means null.
    pub(crate) fn parse_strings(
        &self,
        target: &'static TypeInfo,
        raw: &[&str],
        with: Option<&ConvertWith>,
        member: &str,
        expression: &str,
    ) -> Result<Option<Box<dyn Reflect>>> {
        let declared = target.declared();
        if let KindInfo::List(sequence) | KindInfo::Array(sequence) = declared.kind_info() {
            let item = sequence.item();
            let items = raw
                .iter()
                .map(|raw| self.parse_value(item, raw, with, expression))
                .collect::<Result<Vec<_>>>()?;
            let collected = sequence.from_items(items).map_err(|value| PropertyError::TypeMismatch {
                expression: expression.into(),
                member: member.to_owned(),
                expected: item.type_path(),
                found: value.type_path(),
            })?;
            return Ok(Some(collected));
        }

        match raw {
            [] => Ok(None),
            [raw] => self.parse_value(target, raw, with, expression).map(Some),
            _ => Err(PropertyError::Arity {
                expression: expression.into(),
                member: member.to_owned(),
                count: raw.len(),
            }),
        }
    }

    /// Renders a value through its member's override or the registry.
    pub(crate) fn format_value(
        &self,
        value: &dyn Reflect,
        with: Option<&ConvertWith>,
        expression: &str,
    ) -> Result<String> {
        let converter: &dyn Converter = match with {
            Some(with) => with.converter(),
            None => match value.downcast_ref::<String>() {
                Some(text) => return Ok(text.clone()),
                None => self
                    .get(value.reflect_type_info())
                    .ok_or_else(|| PropertyError::NoConverterFound {
                        expression: expression.into(),
                        type_path: value.type_path(),
                    })?,
            },
        };
        converter.format(value).map_err(|err| PropertyError::Conversion {
            expression: expression.into(),
            type_path: value.type_path(),
            raw: format!("{value:?}"),
            reason: err.to_string(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{coerce, prepare};
    use crate::convert::ConverterRegistry;
    use crate::info::Typed;
    use crate::{PropertyError, Reflect};

    #[test]
    fn coerce_wraps_into_optional() {
        let value = coerce(<Option<u8>>::type_info(), Box::new(4_u8)).unwrap();
        assert_eq!(value.downcast_ref::<Option<u8>>(), Some(&Some(4)));
        assert!(coerce(u8::type_info(), Box::new(4_u16)).is_err());
    }

    #[test]
    fn prepare_relaxes_single_element_collections() {
        let target = String::type_info();
        let one: Box<dyn Reflect> = Box::new(vec!["x".to_owned()]);
        let value = prepare(target, Some(one), "name", "name").unwrap();
        assert_eq!(value.downcast_ref::<String>().unwrap(), "x");

        let two: Box<dyn Reflect> = Box::new(vec!["x".to_owned(), "y".to_owned()]);
        let err = prepare(target, Some(two), "name", "name").unwrap_err();
        assert!(matches!(err, PropertyError::Arity { count: 2, .. }));

        let none: Box<dyn Reflect> = Box::new(Vec::<String>::new());
        let value = prepare(<Option<String>>::type_info(), Some(none), "nick", "nick").unwrap();
        assert_eq!(value.downcast_ref::<Option<String>>(), Some(&None));
    }

    #[test]
    fn null_needs_an_optional_slot() {
        assert!(prepare(<Option<i32>>::type_info(), None, "a", "a").is_ok());
        let err = prepare(i32::type_info(), None, "a", "a").unwrap_err();
        assert!(matches!(err, PropertyError::TypeMismatch { found: "null", .. }));
    }

    #[test]
    fn parse_strings_fills_sequences() {
        let registry = ConverterRegistry::new();
        let value = registry
            .parse_strings(<Vec<u16>>::type_info(), &["1", " 2", "3 "], None, "ids", "ids")
            .unwrap()
            .unwrap();
        assert_eq!(value.downcast_ref::<Vec<u16>>(), Some(&vec![1, 2, 3]));

        let err = registry
            .parse_strings(u16::type_info(), &["1", "2"], None, "id", "id")
            .unwrap_err();
        assert!(matches!(err, PropertyError::Arity { count: 2, .. }));
    }

    #[test]
    fn blank_input_is_null_for_optional_targets() {
        let registry = ConverterRegistry::new();
        let value = registry
            .parse_value(<Option<i32>>::type_info(), "  ", None, "age")
            .unwrap();
        assert_eq!(value.downcast_ref::<Option<i32>>(), Some(&None));
    }

    #[test]
    fn missing_converter_is_reported() {
        let registry = ConverterRegistry::empty();
        let err = registry.parse_value(u8::type_info(), "1", None, "n").unwrap_err();
        assert!(matches!(err, PropertyError::NoConverterFound { .. }));
        // `String` never needs a converter.
        assert!(registry.parse_value(String::type_info(), "1", None, "n").is_ok());
    }
}
