//! Validated vector arithmetic entry points
//!
//! These functions are the public face of the kernels: they check operand
//! shapes, resolve the backend from a [`ComputeConfig`], and only then run a
//! kernel. No partial result is ever produced on error.
//!
//! # Examples
//!
//! ```
//! use simd8::{ops, ComputeConfig, Simd8Error};
//!
//! let a = [250u8, 10, 20];
//! let b = [10u8, 10, 10];
//!
//! assert_eq!(ops::add(&a, &b).unwrap(), vec![4, 20, 30]);
//! assert_eq!(ops::dot_with(&ComputeConfig::scalar(), &a, &b).unwrap(), 2800);
//! assert_eq!(ops::sub(&a, &b[..2]), Err(Simd8Error::LengthMismatch { expected: 3, actual: 2 }));
//! ```

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::kernel;
use crate::{ComputeConfig, Element, KernelTier, OverflowPolicy, Result, Simd8Error};

/// Operand length per chunk under [`OverflowPolicy::Checked`]
///
/// No chunk of this length can overflow a 32-bit accumulator: the largest
/// product magnitude is 255 * 255 = 65025 and 65536 * 65025 < 2^32.
pub const CHECKED_CHUNK_LEN: usize = 65_536;

/// Validate binary operand shapes
///
/// Length disagreement is reported before emptiness.
fn validate<T>(a: &[T], b: &[T]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Simd8Error::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    if a.is_empty() {
        return Err(Simd8Error::EmptyInput);
    }
    Ok(())
}

/// Element-wise wrapping addition on the best available backend
///
/// # Errors
///
/// - [`Simd8Error::LengthMismatch`] if the slices differ in length
/// - [`Simd8Error::EmptyInput`] if the slices are empty
pub fn add<T: Element>(a: &[T], b: &[T]) -> Result<Vec<T>> {
    add_with(&ComputeConfig::default(), a, b)
}

/// Element-wise wrapping subtraction on the best available backend
///
/// # Errors
///
/// Same as [`add`].
pub fn sub<T: Element>(a: &[T], b: &[T]) -> Result<Vec<T>> {
    sub_with(&ComputeConfig::default(), a, b)
}

/// Dot product on the best available backend with wrapping accumulation
///
/// # Errors
///
/// Same as [`add`].
///
/// # Examples
///
/// ```
/// let a: Vec<i8> = (1..=10).collect();
/// assert_eq!(simd8::dot(&a, &a).unwrap(), 385);
/// ```
pub fn dot<T: Element>(a: &[T], b: &[T]) -> Result<T::Acc> {
    dot_with(&ComputeConfig::default(), a, b)
}

/// Element-wise wrapping addition with an explicit configuration
///
/// # Errors
///
/// - [`Simd8Error::LengthMismatch`] if the slices differ in length
/// - [`Simd8Error::EmptyInput`] if the slices are empty
/// - [`Simd8Error::UnsupportedBackend`] if the configured backend cannot run
pub fn add_with<T: Element>(config: &ComputeConfig, a: &[T], b: &[T]) -> Result<Vec<T>> {
    validate(a, b)?;
    let config = config.resolved()?;

    let mut result = vec![T::default(); a.len()];
    // SAFETY: backend resolved and available, lengths validated
    unsafe { kernel::add_on(config.backend, a, b, &mut result) };
    Ok(result)
}

/// Element-wise wrapping subtraction with an explicit configuration
///
/// # Errors
///
/// Same as [`add_with`].
pub fn sub_with<T: Element>(config: &ComputeConfig, a: &[T], b: &[T]) -> Result<Vec<T>> {
    validate(a, b)?;
    let config = config.resolved()?;

    let mut result = vec![T::default(); a.len()];
    // SAFETY: backend resolved and available, lengths validated
    unsafe { kernel::sub_on(config.backend, a, b, &mut result) };
    Ok(result)
}

/// Dot product with an explicit configuration
///
/// The kernel tier is chosen from the operand length by
/// [`KernelTier::select`].
///
/// # Errors
///
/// - [`Simd8Error::LengthMismatch`] if the slices differ in length
/// - [`Simd8Error::EmptyInput`] if the slices are empty
/// - [`Simd8Error::UnsupportedBackend`] if the configured backend cannot run
/// - [`Simd8Error::AccumulatorOverflow`] under [`OverflowPolicy::Checked`]
///   when the exact sum does not fit the accumulator
///
/// # Examples
///
/// ```
/// use simd8::{ops, ComputeConfig, Simd8Error};
///
/// let a = vec![255u8; 70_000];
/// assert_eq!(
///     ops::dot_with(&ComputeConfig::checked(), &a, &a),
///     Err(Simd8Error::AccumulatorOverflow { len: 70_000 })
/// );
/// ```
#[cfg_attr(feature = "tracing", instrument(skip(a, b), fields(element = T::NAME, len = a.len())))]
pub fn dot_with<T: Element>(config: &ComputeConfig, a: &[T], b: &[T]) -> Result<T::Acc> {
    validate(a, b)?;
    let config = config.resolved()?;

    match config.overflow {
        OverflowPolicy::Wrapping => {
            let tier = KernelTier::select(a.len());
            #[cfg(feature = "tracing")]
            tracing::trace!(backend = ?config.backend, tier = %tier, "dot kernel selected");

            // SAFETY: backend resolved and available, lengths validated
            Ok(unsafe { kernel::dot_on(config.backend, tier, a, b) })
        }
        OverflowPolicy::Checked => dot_checked_on(&config, a, b),
    }
}

/// Chunked dot product with exact overflow detection
fn dot_checked_on<T: Element>(config: &ComputeConfig, a: &[T], b: &[T]) -> Result<T::Acc> {
    let mut total: i64 = 0;

    for (chunk_a, chunk_b) in a
        .chunks(CHECKED_CHUNK_LEN)
        .zip(b.chunks(CHECKED_CHUNK_LEN))
    {
        let tier = KernelTier::select(chunk_a.len());
        // SAFETY: backend resolved and available by the caller, chunks of
        // equal-length slices have equal lengths
        let partial = unsafe { kernel::dot_on(config.backend, tier, chunk_a, chunk_b) };
        total += T::acc_to_i64(partial);
    }

    T::acc_from_i64(total).ok_or_else(|| {
        #[cfg(feature = "tracing")]
        tracing::debug!(len = a.len(), total, "dot accumulator overflow");
        Simd8Error::AccumulatorOverflow { len: a.len() }
    })
}
