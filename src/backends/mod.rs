//! Backend implementations for different SIMD instruction sets
//!
//! This module contains the actual kernels for each backend. All backends
//! implement the same trait-based interface so that the dispatcher in
//! [`crate::kernel`] can swap them freely.
//!
//! # Safety
//!
//! All `unsafe` code is isolated within backend implementations. The public API
//! remains 100% safe.
//!
//! # Backends
//!
//! - `scalar`: Portable reference implementation (no SIMD)
//! - `sse2`: x86_64 baseline SIMD (128-bit)
//! - `avx2`: x86_64 advanced SIMD (256-bit)
//! - `avx512`: x86_64 maximum SIMD (512-bit, requires AVX-512BW)
//! - `neon`: aarch64 SIMD (128-bit)

use crate::KernelTier;

pub mod scalar;

#[cfg(target_arch = "x86_64")]
pub mod sse2;

#[cfg(target_arch = "x86_64")]
pub mod avx2;

#[cfg(target_arch = "x86_64")]
pub mod avx512;

#[cfg(target_arch = "aarch64")]
pub mod neon;

/// Backend trait defining the kernel capability contract
///
/// Every implementation must produce results identical to
/// [`scalar::ScalarBackend`] for any length (including zero and lengths that
/// are not a multiple of the register width) and for operand slices at any
/// memory alignment. Dot products accumulate with wrapping 32-bit arithmetic,
/// so equivalence is bit-exact even when the accumulator wraps.
///
/// # Safety
///
/// Implementations may use unsafe SIMD intrinsics. Callers must ensure:
/// - The CPU supports the backend's target features
/// - Slices `a` and `b` have the same length
/// - `result` has length >= `a.len()`
pub trait VectorBackend {
    /// Element-wise wrapping addition: a[i] + b[i]
    ///
    /// # Safety
    ///
    /// - `a` and `b` must have the same length
    /// - `result` must have length >= `a.len()`
    unsafe fn add_i8(a: &[i8], b: &[i8], result: &mut [i8]);

    /// Element-wise wrapping subtraction: a[i] - b[i]
    ///
    /// # Safety
    ///
    /// - `a` and `b` must have the same length
    /// - `result` must have length >= `a.len()`
    unsafe fn sub_i8(a: &[i8], b: &[i8], result: &mut [i8]);

    /// Element-wise wrapping addition: a[i] + b[i]
    ///
    /// # Safety
    ///
    /// - `a` and `b` must have the same length
    /// - `result` must have length >= `a.len()`
    unsafe fn add_u8(a: &[u8], b: &[u8], result: &mut [u8]);

    /// Element-wise wrapping subtraction: a[i] - b[i]
    ///
    /// # Safety
    ///
    /// - `a` and `b` must have the same length
    /// - `result` must have length >= `a.len()`
    unsafe fn sub_u8(a: &[u8], b: &[u8], result: &mut [u8]);

    /// Dot product sum(a[i] * b[i]) in `i32` using the `tier` kernel
    ///
    /// # Safety
    ///
    /// - `a` and `b` must have the same length
    unsafe fn dot_i8(tier: KernelTier, a: &[i8], b: &[i8]) -> i32;

    /// Dot product sum(a[i] * b[i]) in `u32` using the `tier` kernel
    ///
    /// # Safety
    ///
    /// - `a` and `b` must have the same length
    unsafe fn dot_u8(tier: KernelTier, a: &[u8], b: &[u8]) -> u32;
}
