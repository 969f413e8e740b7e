//! Approximate byte weight of cached values.

use std::sync::Arc;

/// Approximate heap footprint of a value, used by byte-budgeted partitions.
pub trait Weigh {
    fn weight(&self) -> usize;
}

macro_rules! weigh_by_size {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Weigh for $ty {
                fn weight(&self) -> usize {
                    std::mem::size_of::<$ty>()
                }
            }
        )*
    };
}

weigh_by_size!(bool, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

impl Weigh for String {
    fn weight(&self) -> usize {
        self.len()
    }
}

impl Weigh for str {
    fn weight(&self) -> usize {
        self.len()
    }
}

impl<T: Weigh> Weigh for Vec<T> {
    fn weight(&self) -> usize {
        self.iter().map(Weigh::weight).sum()
    }
}

impl<T: Weigh> Weigh for Option<T> {
    fn weight(&self) -> usize {
        self.as_ref().map_or(0, Weigh::weight)
    }
}

impl<T: Weigh + ?Sized> Weigh for Arc<T> {
    fn weight(&self) -> usize {
        (**self).weight()
    }
}
