use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::LazyLock;

use crate::convert::{BoolConverter, Converter, FromStrConverter, StringConverter};
use crate::info::{TypeInfo, Typed};
use crate::utils::TypeIdMap;

/// Converters keyed by the type they produce.
///
/// [`ConverterRegistry::new`] covers the primitives and `String`;
/// [`ConverterRegistry::empty`] starts with nothing.
///
/// # Examples
///
/// ```
/// use core::fmt;
/// use core::str::FromStr;
///
/// use vc_property::convert::{ConverterRegistry, FromStrConverter};
/// use vc_property::impl_reflect_opaque;
///
/// #[derive(Debug, PartialEq)]
/// enum Level { Low, High }
///
/// impl FromStr for Level {
///     type Err = String;
///     fn from_str(s: &str) -> Result<Self, String> {
///         match s {
///             "low" => Ok(Level::Low),
///             "high" => Ok(Level::High),
///             _ => Err(format!("unknown level `{s}`")),
///         }
///     }
/// }
///
/// impl fmt::Display for Level {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str(match self { Level::Low => "low", Level::High => "high" })
///     }
/// }
///
/// impl_reflect_opaque!(Level);
///
/// let mut registry = ConverterRegistry::new();
/// assert!(!registry.contains::<Level>());
/// registry.register::<Level>(FromStrConverter::<Level>::new());
/// assert!(registry.contains::<Level>());
/// ```
pub struct ConverterRegistry {
    converters: TypeIdMap<Arc<dyn Converter>>,
}

macro_rules! register_from_str {
    ($registry:ident, $($ty:ty),* $(,)?) => {
        $( $registry.register::<$ty>(FromStrConverter::<$ty>::new()); )*
    };
}

impl ConverterRegistry {
    /// A registry with converters for `bool`, `char`, `String` and every
    /// integer and float type.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry
            .register::<bool>(BoolConverter)
            .register::<String>(StringConverter)
            .register::<char>(FromStrConverter::<char>::untrimmed());
        register_from_str!(
            registry, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
        );
        registry
    }

    /// A registry without any converter.
    pub const fn empty() -> Self {
        Self {
            converters: TypeIdMap::new(),
        }
    }

    /// The process-wide registry used by the free evaluation functions.
    pub fn shared() -> &'static Self {
        static SHARED: LazyLock<ConverterRegistry> = LazyLock::new(ConverterRegistry::new);
        &SHARED
    }

    /// Registers `converter` for values of type `T`, replacing any
    /// previous one.
    pub fn register<T: Typed>(&mut self, converter: impl Converter) -> &mut Self {
        self.converters.insert(TypeId::of::<T>(), Arc::new(converter));
        self
    }

    #[inline]
    pub fn contains<T: Typed>(&self) -> bool {
        self.converters.contains(&TypeId::of::<T>())
    }

    /// Returns the converter producing values of `target`.
    pub fn get(&self, target: &TypeInfo) -> Option<&dyn Converter> {
        self.converters.get(&target.type_id()).map(|c| &**c)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
