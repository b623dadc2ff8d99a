use std::sync::OnceLock;

use crate::info::TypeInfo;
use crate::meta::TypeMetadata;

/// Per-type slot for the validated [`TypeMetadata`].
///
/// Lives inside the type's [`StructInfo`](crate::info::StructInfo), so
/// the slot is found without any lookup. Reads after the first build
/// take no lock.
pub(crate) struct MetadataCell(OnceLock<TypeMetadata>);

impl MetadataCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }
}

/// Returns the validated members of a struct type.
///
/// Metadata is built on first request and kept for the rest of the
/// process. Concurrent first requests block until a single build
/// completes, so the member declarations of a type are processed
/// exactly once. Returns `None` for types that are not structs.
///
/// # Examples
///
/// ```
/// use vc_property::Reflect;
/// use vc_property::info::Typed;
/// use vc_property::meta::describe;
///
/// #[derive(Reflect)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let metadata = describe(Point::type_info()).unwrap();
/// assert!(metadata.field("x").is_some());
/// assert!(core::ptr::eq(metadata, describe(Point::type_info()).unwrap()));
/// assert!(describe(i32::type_info()).is_none());
/// ```
pub fn describe(info: &'static TypeInfo) -> Option<&'static TypeMetadata> {
    let structure = info.as_struct()?;
    Some(
        structure
            .metadata_cell()
            .0
            .get_or_init(|| TypeMetadata::build(info, structure)),
    )
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use crate::Reflect;
    use crate::info::Typed;
    use crate::members::MemberTable;
    use crate::meta::describe;

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    #[derive(Reflect, Default)]
    #[reflect(default, members = Self::count_builds)]
    struct Counted {
        value: u32,
    }

    impl Counted {
        fn count_builds(_: &mut MemberTable<Self>) {
            BUILDS.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let results: Vec<usize> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let metadata = describe(Counted::type_info()).unwrap();
                        core::ptr::from_ref(metadata) as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(describe(Counted::type_info()).unwrap().field("value").is_some());
    }
}
