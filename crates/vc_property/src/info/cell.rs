//! Containers for static storage of [`TypeInfo`].
//!
//! Non-generic types use [`TypeInfoCell`], a thin [`OnceLock`].
//!
//! A `static` inside a generic function is shared by every
//! instantiation, so generic types use [`GenericTypeInfoCell`], which
//! keys the stored info by [`TypeId`].

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::info::TypeInfo;
use crate::utils::TypeIdMap;

/// Static storage for the [`TypeInfo`] of a non-generic type.
///
/// # Examples
///
/// ```
/// use vc_property::info::{TypeInfo, TypeInfoCell, Typed};
/// use vc_property::impl_reflect_opaque;
///
/// struct Token(u64);
/// impl_reflect_opaque!(Token);
///
/// let info = Token::type_info();
/// assert!(info.is::<Token>());
/// assert!(info.create_default().is_none());
/// ```
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, building it with `f` on first use.
    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}

/// Static storage for the [`TypeInfo`] of generic types.
///
/// # Examples
///
/// ```
/// use vc_property::info::{GenericTypeInfoCell, TypeInfo, Typed};
///
/// struct Wrapper<T>(T);
///
/// impl<T: 'static> Typed for Wrapper<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(TypeInfo::opaque::<Self>)
///     }
/// }
///
/// assert!(<Wrapper<u8>>::type_info().is::<Wrapper<u8>>());
/// assert!(<Wrapper<i8>>::type_info().is::<Wrapper<i8>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, building it with `f` on first use.
    ///
    /// `f` runs without holding the lock, so it may request the info of
    /// other types sharing this cell.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &'static TypeInfo {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> TypeInfo,
    ) -> &'static TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || &*Box::leak(Box::new(value)))
    }
}
