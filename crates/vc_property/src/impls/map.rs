use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, TypeInfo, Typed};
use crate::reflection::{Map, ReflectMut, ReflectRef};

/// `$map` must provide inherent `get`, `get_mut`, `len` and `insert`.
macro_rules! impl_reflect_map {
    ($map:ident<$($param:ident),*> where $($bounds:tt)*) => {
        impl<$($param),*> Typed for $map<$($param),*>
        where
            $($bounds)*
        {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| TypeInfo::map::<Self, K, V>().with_default::<Self>())
            }
        }

        impl<$($param),*> Reflect for $map<$($param),*>
        where
            $($bounds)*
        {
            crate::__impl_reflect_common!();

            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Map(self)
            }

            #[inline]
            fn reflect_mut(&mut self) -> ReflectMut<'_> {
                ReflectMut::Map(self)
            }
        }

        impl<$($param),*> Map for $map<$($param),*>
        where
            $($bounds)*
        {
            fn get(&self, key: &dyn Reflect) -> Option<&dyn Reflect> {
                $map::get(self, key.downcast_ref::<K>()?).map(|v| v.as_reflect())
            }

            fn get_mut(&mut self, key: &dyn Reflect) -> Option<&mut dyn Reflect> {
                $map::get_mut(self, key.downcast_ref::<K>()?).map(|v| v.as_reflect_mut())
            }

            #[inline]
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn insert(
                &mut self,
                key: &dyn Reflect,
                value: Box<dyn Reflect>,
            ) -> Result<(), Box<dyn Reflect>> {
                let Some(key) = key.downcast_ref::<K>() else {
                    return Err(value);
                };
                let value = value.take::<V>()?;
                $map::insert(self, key.clone(), value);
                Ok(())
            }
        }
    };
}

impl_reflect_map!(HashMap<K, V, S> where
    K: Reflect + Typed + Eq + Hash + Clone,
    V: Reflect + Typed,
    S: BuildHasher + Default + Send + Sync + 'static,
);

impl_reflect_map!(BTreeMap<K, V> where
    K: Reflect + Typed + Ord + Clone,
    V: Reflect + Typed,
);

impl_reflect_map!(IndexMap<K, V, S> where
    K: Reflect + Typed + Eq + Hash + Clone,
    V: Reflect + Typed,
    S: BuildHasher + Default + Send + Sync + 'static,
);

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use indexmap::IndexMap;

    use crate::reflection::Map;

    #[test]
    fn insert_replaces_existing_value() {
        let mut ordered = IndexMap::<String, u8>::new();
        let map: &mut dyn Map = &mut ordered;

        map.insert(&"b".to_owned(), Box::new(1_u8)).unwrap();
        map.insert(&"a".to_owned(), Box::new(2_u8)).unwrap();
        map.insert(&"b".to_owned(), Box::new(3_u8)).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(ordered.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(ordered["b"], 3);
    }

    #[test]
    fn mismatched_key_is_rejected() {
        let mut scores = BTreeMap::<u32, u32>::new();
        let map: &mut dyn Map = &mut scores;

        let value = map.insert(&"3".to_owned(), Box::new(1_u32)).unwrap_err();
        assert!(value.is::<u32>());
        assert!(map.is_empty());
    }
}
