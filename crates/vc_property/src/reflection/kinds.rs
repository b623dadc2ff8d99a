use crate::Reflect;
use crate::info::ReflectKind;

// -----------------------------------------------------------------------------
// Views

/// An immutable, kind specific view of a reflected value.
pub enum ReflectRef<'a> {
    Struct(&'a dyn Reflect),
    List(&'a dyn List),
    Array(&'a dyn Array),
    Map(&'a dyn Map),
    Optional(&'a dyn Optional),
    Opaque(&'a dyn Reflect),
}

/// A mutable, kind specific view of a reflected value.
pub enum ReflectMut<'a> {
    Struct(&'a mut dyn Reflect),
    List(&'a mut dyn List),
    Array(&'a mut dyn Array),
    Map(&'a mut dyn Map),
    Optional(&'a mut dyn Optional),
    Opaque(&'a mut dyn Reflect),
}

impl ReflectRef<'_> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }
}

impl ReflectMut<'_> {
    pub fn kind(&self) -> ReflectKind {
        match self {
            Self::Struct(_) => ReflectKind::Struct,
            Self::List(_) => ReflectKind::List,
            Self::Array(_) => ReflectKind::Array,
            Self::Map(_) => ReflectKind::Map,
            Self::Optional(_) => ReflectKind::Optional,
            Self::Opaque(_) => ReflectKind::Opaque,
        }
    }
}

// -----------------------------------------------------------------------------
// List

/// A growable, ordered sequence.
///
/// # Examples
///
/// ```
/// use vc_property::reflection::List;
///
/// let mut vec = vec![1_u32];
/// let list: &mut dyn List = &mut vec;
///
/// list.push(Box::new(2_u32)).unwrap();
/// assert!(list.push(Box::new(String::from("three"))).is_err());
/// assert_eq!(list.len(), 2);
/// ```
pub trait List: Reflect {
    /// Returns the element at `index`, or `None` if out of bounds.
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends an element, handing it back if its type does not match.
    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Moves every element out, leaving the list empty.
    fn drain(&mut self) -> Vec<Box<dyn Reflect>>;
}

// -----------------------------------------------------------------------------
// Array

/// A fixed-size sequence.
///
/// The length can only change by replacing the whole value, see
/// [`Array::resized`].
pub trait Array: Reflect {
    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves the elements into a new array of `len` elements.
    ///
    /// New slots hold the element type's default value. Returns `None`,
    /// leaving `self` untouched, when the element type has no default.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_property::reflection::Array;
    ///
    /// let mut items: Box<[Option<u8>]> = Box::new([Some(1), Some(2)]);
    /// let grown = Array::resized(&mut items, 4).unwrap();
    ///
    /// assert!(items.is_empty());
    /// assert_eq!(
    ///     grown.downcast_ref::<Box<[Option<u8>]>>().map(|a| a.len()),
    ///     Some(4),
    /// );
    /// ```
    fn resized(&mut self, len: usize) -> Option<Box<dyn Reflect>>;

    /// Moves every element out, leaving the array empty.
    fn drain(&mut self) -> Vec<Box<dyn Reflect>>;
}

// -----------------------------------------------------------------------------
// Map

/// A keyed collection.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use vc_property::reflection::Map;
///
/// let mut scores = HashMap::<u32, u32>::new();
/// let map: &mut dyn Map = &mut scores;
///
/// map.insert(&3_u32, Box::new(10_u32)).unwrap();
/// assert!(map.get(&3_u32).is_some());
/// assert!(map.get(&"3".to_owned()).is_none());
/// ```
pub trait Map: Reflect {
    /// Returns the value stored under `key`.
    ///
    /// A key of the wrong type is never found.
    fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect>;

    fn get_mut(&mut self, key: &dyn Reflect) -> Option<&mut dyn Reflect>;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stores `value` under a copy of `key`, replacing any previous value.
    ///
    /// Hands `value` back if either type does not match.
    fn insert(&mut self, key: &dyn Reflect, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;
}

// -----------------------------------------------------------------------------
// Optional

/// A slot that may be null.
pub trait Optional: Reflect {
    fn value(&self) -> Option<&dyn Reflect>;

    fn value_mut(&mut self) -> Option<&mut dyn Reflect>;
}
