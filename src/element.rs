//! Element types supported by simd8
//!
//! [`Element`] is sealed and implemented for exactly two types, `i8` and `u8`.
//! It binds each element type to its 32-bit accumulator and routes every
//! operation to the matching [`VectorBackend`] method.

use std::fmt;

use crate::backends::VectorBackend;
use crate::KernelTier;

mod sealed {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for u8 {}
}

/// An 8-bit integer element (`i8` or `u8`)
pub trait Element:
    sealed::Sealed + Copy + Default + PartialEq + Eq + fmt::Debug + Send + Sync + 'static
{
    /// Wide accumulator for dot products and matrix cells
    type Acc: Copy + Default + PartialEq + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Short type name used in diagnostics
    const NAME: &'static str;

    /// Widen an accumulator value losslessly
    fn acc_to_i64(acc: Self::Acc) -> i64;

    /// Narrow an exact sum back to the accumulator, `None` if out of range
    fn acc_from_i64(wide: i64) -> Option<Self::Acc>;

    /// Element-wise wrapping addition on backend `B`
    ///
    /// # Safety
    ///
    /// The CPU must support `B`, `a.len() == b.len()` and
    /// `result.len() >= a.len()`.
    unsafe fn add_on<B: VectorBackend>(a: &[Self], b: &[Self], result: &mut [Self]);

    /// Element-wise wrapping subtraction on backend `B`
    ///
    /// # Safety
    ///
    /// Same contract as [`Element::add_on`].
    unsafe fn sub_on<B: VectorBackend>(a: &[Self], b: &[Self], result: &mut [Self]);

    /// Dot product on backend `B` with the `tier` kernel
    ///
    /// # Safety
    ///
    /// The CPU must support `B` and `a.len() == b.len()`.
    unsafe fn dot_on<B: VectorBackend>(tier: KernelTier, a: &[Self], b: &[Self]) -> Self::Acc;
}

impl Element for i8 {
    type Acc = i32;

    const NAME: &'static str = "i8";

    fn acc_to_i64(acc: i32) -> i64 {
        i64::from(acc)
    }

    fn acc_from_i64(wide: i64) -> Option<i32> {
        i32::try_from(wide).ok()
    }

    unsafe fn add_on<B: VectorBackend>(a: &[i8], b: &[i8], result: &mut [i8]) {
        B::add_i8(a, b, result)
    }

    unsafe fn sub_on<B: VectorBackend>(a: &[i8], b: &[i8], result: &mut [i8]) {
        B::sub_i8(a, b, result)
    }

    unsafe fn dot_on<B: VectorBackend>(tier: KernelTier, a: &[i8], b: &[i8]) -> i32 {
        B::dot_i8(tier, a, b)
    }
}

impl Element for u8 {
    type Acc = u32;

    const NAME: &'static str = "u8";

    fn acc_to_i64(acc: u32) -> i64 {
        i64::from(acc)
    }

    fn acc_from_i64(wide: i64) -> Option<u32> {
        u32::try_from(wide).ok()
    }

    unsafe fn add_on<B: VectorBackend>(a: &[u8], b: &[u8], result: &mut [u8]) {
        B::add_u8(a, b, result)
    }

    unsafe fn sub_on<B: VectorBackend>(a: &[u8], b: &[u8], result: &mut [u8]) {
        B::sub_u8(a, b, result)
    }

    unsafe fn dot_on<B: VectorBackend>(tier: KernelTier, a: &[u8], b: &[u8]) -> u32 {
        B::dot_u8(tier, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(<i8 as Element>::NAME, "i8");
        assert_eq!(<u8 as Element>::NAME, "u8");
    }

    #[test]
    fn test_acc_round_trip_bounds() {
        assert_eq!(i8::acc_from_i64(i64::from(i32::MAX)), Some(i32::MAX));
        assert_eq!(i8::acc_from_i64(i64::from(i32::MIN)), Some(i32::MIN));
        assert_eq!(i8::acc_from_i64(i64::from(i32::MAX) + 1), None);
        assert_eq!(u8::acc_from_i64(i64::from(u32::MAX)), Some(u32::MAX));
        assert_eq!(u8::acc_from_i64(-1), None);
    }
}
