use alloc::collections::VecDeque;

use crate::Reflect;
use crate::info::{GenericTypeInfoCell, TypeInfo, Typed};
use crate::reflection::{Array, List, ReflectMut, ReflectRef};

fn boxed_all<T: Reflect>(items: impl IntoIterator<Item = T>) -> Vec<Box<dyn Reflect>> {
    items
        .into_iter()
        .map(|item| Box::new(item) as Box<dyn Reflect>)
        .collect()
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Reflect + Typed> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::list::<Self, T>().with_default::<Self>())
    }
}

impl<T: Reflect + Typed> Reflect for Vec<T> {
    crate::__impl_reflect_common!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::List(self)
    }
}

impl<T: Reflect + Typed> List for Vec<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(|v| v.as_reflect())
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|v| v.as_reflect_mut())
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        Vec::push(self, value.take::<T>()?);
        Ok(())
    }

    fn drain(&mut self) -> Vec<Box<dyn Reflect>> {
        boxed_all(core::mem::take(self))
    }
}

// -----------------------------------------------------------------------------
// VecDeque

impl<T: Reflect + Typed> Typed for VecDeque<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::list::<Self, T>().with_default::<Self>())
    }
}

impl<T: Reflect + Typed> Reflect for VecDeque<T> {
    crate::__impl_reflect_common!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::List(self)
    }
}

impl<T: Reflect + Typed> List for VecDeque<T> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(|v| v.as_reflect())
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        VecDeque::get_mut(self, index).map(|v| v.as_reflect_mut())
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn push(&mut self, value: Box<dyn Reflect>) -> Result<(), Box<dyn Reflect>> {
        self.push_back(value.take::<T>()?);
        Ok(())
    }

    fn drain(&mut self) -> Vec<Box<dyn Reflect>> {
        boxed_all(core::mem::take(self))
    }
}

// -----------------------------------------------------------------------------
// Box<[T]>

impl<T: Reflect + Typed> Typed for Box<[T]> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| TypeInfo::array::<T>().with_default::<Self>())
    }
}

impl<T: Reflect + Typed> Reflect for Box<[T]> {
    crate::__impl_reflect_common!();

    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Array(self)
    }

    #[inline]
    fn reflect_mut(&mut self) -> ReflectMut<'_> {
        ReflectMut::Array(self)
    }
}

impl<T: Reflect + Typed> Array for Box<[T]> {
    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|v| v.as_reflect())
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|v| v.as_reflect_mut())
    }

    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn resized(&mut self, len: usize) -> Option<Box<dyn Reflect>> {
        let item = T::type_info();
        if len > <[T]>::len(self) && item.create_default().is_none() {
            return None;
        }

        let mut items = core::mem::take(self).into_vec();
        items.truncate(len);
        while items.len() < len {
            match item.create_default().map(|value| value.take::<T>()) {
                Some(Ok(value)) => items.push(value),
                _ => break,
            }
        }
        Some(Box::new(items.into_boxed_slice()))
    }

    fn drain(&mut self) -> Vec<Box<dyn Reflect>> {
        boxed_all(core::mem::take(self).into_vec())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;

    use crate::Reflect;
    use crate::reflection::{Array, List, ReflectRef};

    #[test]
    fn list_push_rejects_foreign_items() {
        let mut deque = VecDeque::from([1_i64]);
        let list: &mut dyn List = &mut deque;

        let rejected = list.push(Box::new(2_i32)).unwrap_err();
        assert!(rejected.is::<i32>());
        list.push(Box::new(2_i64)).unwrap();
        assert_eq!(deque, [1, 2]);
    }

    #[test]
    fn array_resize_keeps_prefix() {
        let mut items: Box<[Option<String>]> = Box::new([Some("a".to_owned()), None]);
        let grown = Array::resized(&mut items, 6).unwrap();
        let grown = grown.take::<Box<[Option<String>]>>().unwrap();

        assert_eq!(grown.len(), 6);
        assert_eq!(grown[0].as_deref(), Some("a"));
        assert!(grown[1..].iter().all(Option::is_none));
    }

    #[test]
    fn drain_empties_the_list() {
        let mut vec = vec![1_u8, 2, 3];
        let drained = List::drain(&mut vec);
        assert_eq!(drained.len(), 3);
        assert!(vec.is_empty());
        assert!(matches!(drained[0].reflect_ref(), ReflectRef::Opaque(_)));
    }
}
