//! Reflection for foreign types.
//!
//! - Primitives and `String` are opaque leaves with a default value.
//! - `Option<T>` is the nullable slot.
//! - `Vec<T>` and `VecDeque<T>` are lists, `Box<[T]>` is an array.
//! - `HashMap`, `BTreeMap` and [`indexmap::IndexMap`] are maps.

// -----------------------------------------------------------------------------
// Modules

mod map;
mod option;
mod primitives;
mod sequence;

// -----------------------------------------------------------------------------
// Macros

#[doc(hidden)]
#[macro_export]
macro_rules! __impl_reflect_common {
    () => {
        #[inline]
        fn as_reflect(&self) -> &dyn $crate::Reflect {
            self
        }

        #[inline]
        fn as_reflect_mut(&mut self) -> &mut dyn $crate::Reflect {
            self
        }

        fn set(
            &mut self,
            value: $crate::__macro_exports::Box<dyn $crate::Reflect>,
        ) -> ::core::result::Result<(), $crate::__macro_exports::Box<dyn $crate::Reflect>> {
            *self = value.take::<Self>()?;
            ::core::result::Result::Ok(())
        }
    };
}

/// Implements `Typed` and `Reflect` for a leaf type.
///
/// Opaque values are never walked into; they are read, written and
/// converted as a whole. Append `: Default` when the type implements
/// [`Default`], so that missing values of it can be created.
///
/// # Examples
///
/// ```
/// use vc_property::impl_reflect_opaque;
/// use vc_property::info::{ReflectKind, Typed};
///
/// #[derive(Default, Clone, Copy, PartialEq, Debug)]
/// enum Color {
///     #[default]
///     Red,
///     Blue,
/// }
///
/// impl_reflect_opaque!(Color: Default);
///
/// assert_eq!(Color::type_info().kind(), ReflectKind::Opaque);
/// assert!(Color::type_info().create_default().is_some());
/// ```
#[macro_export]
macro_rules! impl_reflect_opaque {
    (@impl $ty:ty, $($with:tt)*) => {
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::TypeInfoCell = $crate::info::TypeInfoCell::new();
                CELL.get_or_init(|| $crate::info::TypeInfo::opaque::<$ty>() $($with)*)
            }
        }

        impl $crate::Reflect for $ty {
            $crate::__impl_reflect_common!();

            #[inline]
            fn reflect_ref(&self) -> $crate::reflection::ReflectRef<'_> {
                $crate::reflection::ReflectRef::Opaque(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> $crate::reflection::ReflectMut<'_> {
                $crate::reflection::ReflectMut::Opaque(self)
            }
        }
    };
    ($ty:ty : Default) => {
        $crate::impl_reflect_opaque!(@impl $ty, .with_default::<$ty>());
    };
    ($ty:ty) => {
        $crate::impl_reflect_opaque!(@impl $ty,);
    };
}
