use core::any::{Any, TypeId};
use core::fmt;

use crate::Reflect;
use crate::info::Typed;
use crate::members::{MemberDeclarations, MemberTable};
use crate::meta::MetadataCell;

// -----------------------------------------------------------------------------
// ReflectKind

/// The shape of a reflected type, as seen by the path walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    /// A type whose members are looked up by name.
    Struct,
    /// A growable sequence, like `Vec<T>` or `VecDeque<T>`.
    List,
    /// A fixed-size sequence, `Box<[T]>`. Growing it means replacing it.
    Array,
    /// A keyed collection.
    Map,
    /// A nullable slot, `Option<T>`.
    Optional,
    /// A leaf value, converted to and from strings as a whole.
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Struct => "struct",
            Self::List => "list",
            Self::Array => "array",
            Self::Map => "map",
            Self::Optional => "optional",
            Self::Opaque => "opaque",
        })
    }
}

// -----------------------------------------------------------------------------
// Kind specific info

/// Member declarations of a struct, plus the lazily built metadata.
pub struct StructInfo {
    declare: Box<dyn Fn() -> MemberDeclarations + Send + Sync>,
    metadata: MetadataCell,
}

impl StructInfo {
    /// Runs the declaration function, producing a fresh set of raw
    /// member declarations.
    pub(crate) fn declarations(&self) -> MemberDeclarations {
        (self.declare)()
    }

    #[inline]
    pub(crate) fn metadata_cell(&self) -> &MetadataCell {
        &self.metadata
    }
}

/// Element type of a list or array, plus a way to build one from items.
#[derive(Clone, Copy)]
pub struct SequenceInfo {
    item: fn() -> &'static TypeInfo,
    from_items: fn(Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl SequenceInfo {
    #[inline]
    pub fn item(&self) -> &'static TypeInfo {
        (self.item)()
    }

    /// Collects `items` into the sequence type.
    ///
    /// Hands back the first item whose type does not match.
    #[inline]
    pub fn from_items(&self, items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.from_items)(items)
    }
}

/// Key and value types of a map.
#[derive(Clone, Copy)]
pub struct MapInfo {
    key: fn() -> &'static TypeInfo,
    value: fn() -> &'static TypeInfo,
}

impl MapInfo {
    #[inline]
    pub fn key(&self) -> &'static TypeInfo {
        (self.key)()
    }

    #[inline]
    pub fn value(&self) -> &'static TypeInfo {
        (self.value)()
    }
}

/// Inner type of an `Option<T>`.
#[derive(Clone, Copy)]
pub struct OptionalInfo {
    inner: fn() -> &'static TypeInfo,
    wrap: fn(Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>,
}

impl OptionalInfo {
    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }

    /// Turns a boxed `T` into a boxed `Some(T)`.
    #[inline]
    pub fn wrap(&self, value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
        (self.wrap)(value)
    }
}

/// Kind specific part of a [`TypeInfo`].
pub enum KindInfo {
    Struct(StructInfo),
    List(SequenceInfo),
    Array(SequenceInfo),
    Map(MapInfo),
    Optional(OptionalInfo),
    Opaque,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a reflected type.
pub struct TypeInfo {
    type_id: TypeId,
    type_path: &'static str,
    kind: KindInfo,
    default: Option<fn() -> Box<dyn Reflect>>,
}

fn boxed_default<T: Reflect + Default>() -> Box<dyn Reflect> {
    Box::new(T::default())
}

fn boxed_none<T: Reflect + Typed>() -> Box<dyn Reflect> {
    Box::new(None::<T>)
}

fn wrap_some<T: Reflect + Typed>(value: Box<dyn Reflect>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>> {
    Ok(Box::new(Some(value.take::<T>()?)))
}

fn collect_items<S, T>(items: Vec<Box<dyn Reflect>>) -> Result<Box<dyn Reflect>, Box<dyn Reflect>>
where
    S: Reflect + FromIterator<T>,
    T: Reflect,
{
    let mut typed = Vec::with_capacity(items.len());
    for item in items {
        typed.push(item.take::<T>()?);
    }
    Ok(Box::new(typed.into_iter().collect::<S>()))
}

impl TypeInfo {
    fn new<T: Any>(kind: KindInfo) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: core::any::type_name::<T>(),
            kind,
            default: None,
        }
    }

    /// Info for a leaf type.
    pub fn opaque<T: Any>() -> Self {
        Self::new::<T>(KindInfo::Opaque)
    }

    /// Info for a struct whose members are registered by `declare`.
    ///
    /// `declare` runs once, the first time the struct's metadata is
    /// requested.
    pub fn structure<T: Reflect>(declare: fn(&mut MemberTable<T>)) -> Self {
        Self::new::<T>(KindInfo::Struct(StructInfo {
            declare: Box::new(move || {
                let mut table = MemberTable::<T>::new();
                declare(&mut table);
                table.into_declarations()
            }),
            metadata: MetadataCell::new(),
        }))
    }

    /// Info for a growable sequence `S` of `T`.
    pub fn list<S, T>() -> Self
    where
        S: Reflect + FromIterator<T>,
        T: Reflect + Typed,
    {
        Self::new::<S>(KindInfo::List(SequenceInfo {
            item: T::type_info,
            from_items: collect_items::<S, T>,
        }))
    }

    /// Info for the fixed-size sequence `Box<[T]>`.
    pub fn array<T: Reflect + Typed>() -> Self {
        Self::new::<Box<[T]>>(KindInfo::Array(SequenceInfo {
            item: T::type_info,
            from_items: collect_items::<Box<[T]>, T>,
        }))
    }

    /// Info for a map `M` from `K` to `V`.
    pub fn map<M: Any, K: Typed, V: Typed>() -> Self {
        Self::new::<M>(KindInfo::Map(MapInfo {
            key: K::type_info,
            value: V::type_info,
        }))
    }

    /// Info for `Option<T>`, whose default is `None`.
    pub fn optional<T: Reflect + Typed>() -> Self {
        let mut info = Self::new::<Option<T>>(KindInfo::Optional(OptionalInfo {
            inner: T::type_info,
            wrap: wrap_some::<T>,
        }));
        info.default = Some(boxed_none::<T>);
        info
    }

    /// Records `T::default` as the way to construct a fresh instance.
    pub fn with_default<T: Reflect + Default>(mut self) -> Self {
        debug_assert_eq!(self.type_id, TypeId::of::<T>());
        self.default = Some(boxed_default::<T>);
        self
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The full type name, as reported by [`core::any::type_name`].
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[inline]
    pub fn kind_info(&self) -> &KindInfo {
        &self.kind
    }

    pub fn kind(&self) -> ReflectKind {
        match &self.kind {
            KindInfo::Struct(_) => ReflectKind::Struct,
            KindInfo::List(_) => ReflectKind::List,
            KindInfo::Array(_) => ReflectKind::Array,
            KindInfo::Map(_) => ReflectKind::Map,
            KindInfo::Optional(_) => ReflectKind::Optional,
            KindInfo::Opaque => ReflectKind::Opaque,
        }
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, KindInfo::Optional(_))
    }

    /// Strips one `Option` layer, returning the type values are
    /// actually stored as.
    pub fn declared(&'static self) -> &'static TypeInfo {
        match &self.kind {
            KindInfo::Optional(info) => info.inner(),
            _ => self,
        }
    }

    pub fn as_struct(&self) -> Option<&StructInfo> {
        match &self.kind {
            KindInfo::Struct(info) => Some(info),
            _ => None,
        }
    }

    /// Constructs a fresh instance, if the type has a known default.
    pub fn create_default(&self) -> Option<Box<dyn Reflect>> {
        self.default.map(|f| f())
    }

    /// The value representing null in a slot of this type.
    ///
    /// Only optional slots can hold null.
    pub fn null_value(&self) -> Option<Box<dyn Reflect>> {
        if self.is_optional() {
            self.create_default()
        } else {
            None
        }
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_path", &self.type_path)
            .field("kind", &self.kind())
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::Reflect;
    use crate::info::{KindInfo, ReflectKind, Typed};

    #[test]
    fn optional_strips_to_inner() {
        let info = <Option<i32>>::type_info();
        assert_eq!(info.kind(), ReflectKind::Optional);
        assert!(info.declared().is::<i32>());
        assert!(info.null_value().is_some());
        assert!(i32::type_info().null_value().is_none());
    }

    #[test]
    fn sequence_collects_items() {
        let KindInfo::List(seq) = <Vec<u8>>::type_info().kind_info() else {
            panic!("Vec should be a list");
        };
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_u8), Box::new(2_u8)];
        let list = seq.from_items(items).unwrap();
        assert_eq!(list.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2]));

        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_u8), Box::new("x".to_owned())];
        assert!(seq.from_items(items).unwrap_err().is::<String>());
    }

    #[test]
    fn array_has_array_kind() {
        let info = <Box<[u8]>>::type_info();
        assert_eq!(info.kind(), ReflectKind::Array);
        assert!(info.create_default().is_some());
    }
}
