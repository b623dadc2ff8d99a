use crate::impl_reflect_opaque;

macro_rules! impl_primitives {
    ($($ty:ty),* $(,)?) => {
        $( impl_reflect_opaque!($ty: Default); )*
    };
}

impl_primitives!(
    bool, char, String,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
);
