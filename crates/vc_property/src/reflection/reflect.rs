use core::any::Any;
use core::fmt;

use crate::info::DynamicTyped;
use crate::reflection::{ReflectMut, ReflectRef};

/// A value whose type and contents can be inspected at runtime.
///
/// Implemented by `#[derive(Reflect)]` for structs, by
/// [`impl_reflect_opaque!`](crate::impl_reflect_opaque) for leaf types,
/// and by this crate for primitives, `String`, `Option`, the standard
/// sequences and maps, and [`indexmap::IndexMap`].
pub trait Reflect: DynamicTyped + Any + Send + Sync {
    /// Casts this type to a reflected value.
    fn as_reflect(&self) -> &dyn Reflect;

    /// Casts this type to a mutable reflected value.
    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    /// Replaces `self` with `value`.
    ///
    /// Hands `value` back if it is not of the same type.
    fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>>;

    /// Returns an immutable, kind specific view of the value.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns a mutable, kind specific view of the value.
    fn reflect_mut(&mut self) -> ReflectMut<'_>;
}

impl dyn Reflect {
    /// Returns `true` if the underlying value is of type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_property::Reflect;
    /// let x: Box<dyn Reflect> = Box::new(10_i32);
    /// assert!(x.is::<i32>());
    /// ```
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        <dyn Any>::is::<T>(self)
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Moves the value out of the box as `T`.
    ///
    /// If the underlying value is not of type `T`, returns it unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use vc_property::Reflect;
    /// let x: Box<dyn Reflect> = Box::new(String::from("a"));
    /// let x = x.take::<u8>().unwrap_err();
    /// assert_eq!(x.take::<String>().unwrap(), "a");
    /// ```
    pub fn take<T: Any>(self: Box<Self>) -> Result<T, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        let any: Box<dyn Any> = self;
        match any.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type was checked above"),
        }
    }

    /// The full type name of the underlying value.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.reflect_type_info().type_path()
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reflect_ref() {
            ReflectRef::List(list) => f
                .debug_list()
                .entries((0..list.len()).filter_map(|i| list.get(i)))
                .finish(),
            ReflectRef::Array(array) => f
                .debug_list()
                .entries((0..array.len()).filter_map(|i| array.get(i)))
                .finish(),
            ReflectRef::Optional(optional) => match optional.value() {
                Some(value) => f.debug_tuple("Some").field(&value).finish(),
                None => f.write_str("None"),
            },
            ReflectRef::Map(map) => write!(f, "{}(len = {})", self.type_path(), map.len()),
            ReflectRef::Struct(_) | ReflectRef::Opaque(_) => {
                write!(f, "Reflect({})", self.type_path())
            }
        }
    }
}
