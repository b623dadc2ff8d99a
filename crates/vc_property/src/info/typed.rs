use crate::info::TypeInfo;

/// A static accessor to compile-time type information.
///
/// Usually implemented by `#[derive(Reflect)]`, by
/// [`impl_reflect_opaque!`](crate::impl_reflect_opaque), or by the
/// container impls shipped with this crate.
///
/// # Examples
///
/// ```
/// use vc_property::info::{ReflectKind, Typed};
///
/// assert_eq!(<Vec<u8>>::type_info().kind(), ReflectKind::List);
/// assert_eq!(<Option<u8>>::type_info().declared().type_path(), "u8");
/// ```
pub trait Typed: 'static {
    /// Returns the compile-time info for the underlying type.
    fn type_info() -> &'static TypeInfo;
}

/// Dynamic dispatch for [`Typed`].
///
/// Implemented for every `T: Typed`, so a `dyn Reflect` can always
/// report its concrete type info.
pub trait DynamicTyped {
    /// See [`Typed::type_info`].
    fn reflect_type_info(&self) -> &'static TypeInfo;
}

impl<T: Typed> DynamicTyped for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        Self::type_info()
    }
}
