use core::any::Any;
use core::fmt;

use crate::utils::TypeIdMap;

/// Capability tags attached to a member declaration.
///
/// A tag is any `'static` value, looked up by its type. Tags let callers
/// mark members with extra behavior, such as a custom converter, without
/// the evaluator knowing about them.
///
/// # Examples
///
/// ```
/// use vc_property::members::Tags;
///
/// struct Required;
/// struct MaxLength(usize);
///
/// let mut tags = Tags::new();
/// tags.insert(Required).insert(MaxLength(32));
///
/// assert!(tags.contains::<Required>());
/// assert_eq!(tags.get::<MaxLength>().map(|m| m.0), Some(32));
/// assert!(tags.get::<String>().is_none());
/// ```
#[derive(Default)]
pub struct Tags(TypeIdMap<Box<dyn Any + Send + Sync>>);

impl Tags {
    #[inline]
    pub const fn new() -> Self {
        Self(TypeIdMap::new())
    }

    /// Attaches `tag`, replacing any tag of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, tag: T) -> &mut Self {
        self.0.insert(core::any::TypeId::of::<T>(), Box::new(tag));
        self
    }

    /// Builder form of [`Tags::insert`].
    pub fn with<T: Any + Send + Sync>(mut self, tag: T) -> Self {
        self.insert(tag);
        self
    }

    pub fn get<T: Any>(&self) -> Option<&T> {
        let tag: &(dyn Any + Send + Sync) = &**self.0.get_type::<T>()?;
        tag.downcast_ref::<T>()
    }

    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.0.get_type::<T>().is_some()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tags({})", self.len())
    }
}
