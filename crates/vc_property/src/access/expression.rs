use alloc::sync::Arc;
use core::fmt;
use core::str::FromStr;

use crate::access::Atom;
use crate::access::path::tokenize;
use crate::error::{PropertyError, Result};

struct Parsed {
    source: Box<str>,
    atoms: Box<[Atom]>,
}

/// A tokenized property expression.
///
/// Cheap to clone. With the `path_cache` feature enabled, parsing the
/// same text twice returns the same shared atoms.
///
/// # Examples
///
/// ```
/// use vc_property::PropertyExpression;
///
/// let expression = PropertyExpression::parse("orders[0].lines['sku'].qty").unwrap();
/// assert_eq!(expression.len(), 5);
/// assert_eq!(expression.to_string(), "orders[0].lines['sku'].qty");
///
/// assert!(PropertyExpression::parse("orders[0").is_err());
/// ```
#[derive(Clone)]
pub struct PropertyExpression(Arc<Parsed>);

impl PropertyExpression {
    /// Tokenizes `expression`, or returns the cached result.
    pub fn parse(expression: &str) -> Result<Self> {
        #[cfg(feature = "path_cache")]
        {
            cache::parse(expression)
        }
        #[cfg(not(feature = "path_cache"))]
        {
            Self::tokenize(expression)
        }
    }

    fn tokenize(expression: &str) -> Result<Self> {
        let atoms = tokenize(expression)?;
        Ok(Self(Arc::new(Parsed {
            source: expression.into(),
            atoms: atoms.into_boxed_slice(),
        })))
    }

    /// The expression text as written.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0.source
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.0.atoms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.atoms.is_empty()
    }
}

impl FromStr for PropertyExpression {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.source)
    }
}

impl fmt::Debug for PropertyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyExpression").field(&self.as_str()).finish()
    }
}

// -----------------------------------------------------------------------------
// Cache

#[cfg(feature = "path_cache")]
mod cache {
    use std::sync::{PoisonError, RwLock};

    use log::trace;

    use super::PropertyExpression;
    use crate::error::Result;
    use crate::utils::{HashMap, new_map};

    static EXPRESSIONS: RwLock<HashMap<Box<str>, PropertyExpression>> = RwLock::new(new_map());

    pub(super) fn parse(expression: &str) -> Result<PropertyExpression> {
        let hit = EXPRESSIONS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(expression)
            .cloned();
        if let Some(hit) = hit {
            return Ok(hit);
        }

        let mut expressions = EXPRESSIONS.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = expressions.get(expression) {
            return Ok(hit.clone());
        }
        trace!("tokenizing `{expression}`");
        let parsed = PropertyExpression::tokenize(expression)?;
        expressions.insert(expression.into(), parsed.clone());
        Ok(parsed)
    }

    #[cfg(test)]
    mod tests {
        use alloc::sync::Arc;

        use crate::PropertyExpression;

        #[test]
        fn same_text_shares_atoms() {
            let a = PropertyExpression::parse("cache.test[0]").unwrap();
            let b = PropertyExpression::parse("cache.test[0]").unwrap();
            assert!(Arc::ptr_eq(&a.0, &b.0));
        }

        #[test]
        fn errors_are_not_cached() {
            assert!(PropertyExpression::parse("cache..test").is_err());
            assert!(PropertyExpression::parse("cache..test").is_err());
        }
    }
}
