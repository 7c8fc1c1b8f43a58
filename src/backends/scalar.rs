//! Scalar (non-SIMD) backend implementation
//!
//! This is the portable reference implementation that works on all platforms.
//! It uses simple loops without any SIMD instructions and defines the results
//! every other backend must reproduce bit for bit.
//!
//! Besides the [`VectorBackend`] impl, the module exposes safe validated
//! entry points ([`add`], [`sub`], [`dot`]) for reference computations. They
//! only enforce equal lengths; empty operands yield an empty vector or zero.

use super::VectorBackend;
use crate::{Element, KernelTier, Result, Simd8Error};

/// Scalar backend (portable, no SIMD)
pub struct ScalarBackend;

impl VectorBackend for ScalarBackend {
    // SAFETY: This function is safe because:
    // 1. All slice accesses go through bounds-checked iterators
    // 2. No raw pointer arithmetic is performed
    // 3. Marked unsafe only to match VectorBackend trait interface
    unsafe fn add_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        for ((r, &x), &y) in result.iter_mut().zip(a).zip(b) {
            *r = x.wrapping_add(y);
        }
    }

    // SAFETY: see add_i8
    unsafe fn sub_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        for ((r, &x), &y) in result.iter_mut().zip(a).zip(b) {
            *r = x.wrapping_sub(y);
        }
    }

    // SAFETY: see add_i8
    unsafe fn add_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        for ((r, &x), &y) in result.iter_mut().zip(a).zip(b) {
            *r = x.wrapping_add(y);
        }
    }

    // SAFETY: see add_i8
    unsafe fn sub_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        for ((r, &x), &y) in result.iter_mut().zip(a).zip(b) {
            *r = x.wrapping_sub(y);
        }
    }

    // SAFETY: Safe loop; every tier shares the same reference computation
    unsafe fn dot_i8(_tier: KernelTier, a: &[i8], b: &[i8]) -> i32 {
        dot_i8_ref(a, b)
    }

    // SAFETY: Safe loop; every tier shares the same reference computation
    unsafe fn dot_u8(_tier: KernelTier, a: &[u8], b: &[u8]) -> u32 {
        dot_u8_ref(a, b)
    }
}

/// Reference signed dot product with wrapping accumulation
///
/// SIMD kernels also use this for their remainder elements.
#[inline]
pub(crate) fn dot_i8_ref(a: &[i8], b: &[i8]) -> i32 {
    a.iter()
        .zip(b)
        .fold(0i32, |acc, (&x, &y)| {
            acc.wrapping_add(i32::from(x) * i32::from(y))
        })
}

/// Reference unsigned dot product with wrapping accumulation
#[inline]
pub(crate) fn dot_u8_ref(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b)
        .fold(0u32, |acc, (&x, &y)| {
            acc.wrapping_add(u32::from(x) * u32::from(y))
        })
}

fn check_lengths<T>(a: &[T], b: &[T]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Simd8Error::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Reference element-wise wrapping addition
///
/// # Errors
///
/// Returns [`Simd8Error::LengthMismatch`] if the slices differ in length.
///
/// # Examples
///
/// ```
/// use simd8::backends::scalar;
///
/// assert_eq!(scalar::add(&[255u8, 1], &[1u8, 1]).unwrap(), vec![0, 2]);
/// ```
pub fn add<T: Element>(a: &[T], b: &[T]) -> Result<Vec<T>> {
    check_lengths(a, b)?;
    let mut result = vec![T::default(); a.len()];
    // SAFETY: ScalarBackend has no target-feature requirements and the
    // lengths were checked above.
    unsafe { T::add_on::<ScalarBackend>(a, b, &mut result) };
    Ok(result)
}

/// Reference element-wise wrapping subtraction
///
/// # Errors
///
/// Returns [`Simd8Error::LengthMismatch`] if the slices differ in length.
pub fn sub<T: Element>(a: &[T], b: &[T]) -> Result<Vec<T>> {
    check_lengths(a, b)?;
    let mut result = vec![T::default(); a.len()];
    // SAFETY: see add
    unsafe { T::sub_on::<ScalarBackend>(a, b, &mut result) };
    Ok(result)
}

/// Reference dot product with wrapping accumulation
///
/// # Errors
///
/// Returns [`Simd8Error::LengthMismatch`] if the slices differ in length.
///
/// # Examples
///
/// ```
/// use simd8::backends::scalar;
///
/// let a: Vec<i8> = (1..=10).collect();
/// assert_eq!(scalar::dot(&a, &a).unwrap(), 385);
/// ```
pub fn dot<T: Element>(a: &[T], b: &[T]) -> Result<T::Acc> {
    check_lengths(a, b)?;
    // SAFETY: see add
    Ok(unsafe { T::dot_on::<ScalarBackend>(KernelTier::select(a.len()), a, b) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_add_wraps() {
        assert_eq!(add(&[127i8, -128, 5], &[1i8, -1, -5]).unwrap(), vec![-128, 127, 0]);
        assert_eq!(add(&[255u8, 200], &[1u8, 100]).unwrap(), vec![0, 44]);
    }

    #[test]
    fn test_scalar_sub_wraps() {
        assert_eq!(sub(&[-128i8, 127], &[1i8, -1]).unwrap(), vec![127, -128]);
        assert_eq!(sub(&[0u8, 10], &[1u8, 3]).unwrap(), vec![255, 7]);
    }

    #[test]
    fn test_scalar_dot() {
        let a: Vec<i8> = (1..=10).collect();
        assert_eq!(dot(&a, &a).unwrap(), 385);

        let u: Vec<u8> = (1..=10).collect();
        assert_eq!(dot(&u, &u).unwrap(), 385u32);
    }

    #[test]
    fn test_scalar_dot_extremes() {
        let a = [-128i8; 4];
        assert_eq!(dot(&a, &a).unwrap(), 4 * 16384);

        let b = [127i8; 4];
        assert_eq!(dot(&a, &b).unwrap(), -4 * 16256);

        let u = [255u8; 4];
        assert_eq!(dot(&u, &u).unwrap(), 4 * 65025);
    }

    #[test]
    fn test_scalar_dot_wraps_accumulator() {
        // 66052 * 65025 exceeds u32::MAX
        let u = vec![255u8; 66_052];
        let expected = (66_052u64 * 65_025) as u32;
        assert_eq!(dot(&u, &u).unwrap(), expected);
    }

    #[test]
    fn test_scalar_empty_is_allowed() {
        let empty: [i8; 0] = [];
        assert_eq!(add(&empty, &empty).unwrap(), Vec::<i8>::new());
        assert_eq!(dot(&empty, &empty).unwrap(), 0);
    }

    #[test]
    fn test_scalar_length_mismatch() {
        assert_eq!(
            add(&[1u8, 2], &[1u8]),
            Err(Simd8Error::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(sub(&[1i8], &[1i8, 2]).is_err());
        assert!(dot(&[1i8], &[]).is_err());
    }

    #[test]
    fn test_scalar_tiers_agree() {
        let a: Vec<i8> = (0..100).map(|i| (i * 7 - 50) as i8).collect();
        let b: Vec<i8> = (0..100).map(|i| (i * 3 + 1) as i8).collect();
        let results: Vec<i32> = KernelTier::ALL
            .iter()
            .map(|&tier| unsafe { ScalarBackend::dot_i8(tier, &a, &b) })
            .collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
