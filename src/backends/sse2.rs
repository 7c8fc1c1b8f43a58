//! SSE2 backend implementation (x86_64 baseline SIMD)
//!
//! This backend uses SSE2 intrinsics for 128-bit SIMD operations.
//! SSE2 is available on all x86_64 CPUs as a baseline requirement.
//!
//! # Kernels
//!
//! - add/sub: 16 bytes per iteration (`paddb`/`psubb`, wrapping)
//! - dot W16/W32/W64: 1, 2 or 4 independent 128-bit accumulators per iteration
//!
//! Bytes are widened to 16 bits (sign-extended for `i8`, zero-extended for
//! `u8`) and multiplied pairwise into 32-bit lanes with `pmaddwd`. A pair sum
//! is at most 2 * 255 * 255, which fits a signed 32-bit lane.
//!
//! # Safety
//!
//! All SSE2 intrinsics are marked `unsafe` by Rust. Loads and stores are
//! unaligned (`loadu`/`storeu`), so operand alignment is irrelevant.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::scalar::{dot_i8_ref, dot_u8_ref};
use super::VectorBackend;
use crate::KernelTier;

const LANES: usize = 16;

/// SSE2 backend (128-bit SIMD for x86_64)
pub struct Sse2Backend;

impl VectorBackend for Sse2Backend {
    #[target_feature(enable = "sse2")]
    unsafe fn add_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        add_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "sse2")]
    unsafe fn sub_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        sub_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "sse2")]
    unsafe fn add_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        add_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "sse2")]
    unsafe fn sub_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        sub_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "sse2")]
    unsafe fn dot_i8(tier: KernelTier, a: &[i8], b: &[i8]) -> i32 {
        match tier {
            KernelTier::W16 => dot_i8_unrolled::<1>(a, b),
            KernelTier::W32 => dot_i8_unrolled::<2>(a, b),
            KernelTier::W64 => dot_i8_unrolled::<4>(a, b),
        }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn dot_u8(tier: KernelTier, a: &[u8], b: &[u8]) -> u32 {
        match tier {
            KernelTier::W16 => dot_u8_unrolled::<1>(a, b),
            KernelTier::W32 => dot_u8_unrolled::<2>(a, b),
            KernelTier::W64 => dot_u8_unrolled::<4>(a, b),
        }
    }
}

// Wrapping byte addition is the same bit operation for i8 and u8.
#[target_feature(enable = "sse2")]
unsafe fn add_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = _mm_loadu_si128(a.add(i).cast());
        let vb = _mm_loadu_si128(b.add(i).cast());
        _mm_storeu_si128(result.add(i).cast(), _mm_add_epi8(va, vb));
        i += LANES;
    }

    // Handle remaining elements with scalar code
    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_add(*b.add(j));
    }
}

#[target_feature(enable = "sse2")]
unsafe fn sub_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = _mm_loadu_si128(a.add(i).cast());
        let vb = _mm_loadu_si128(b.add(i).cast());
        _mm_storeu_si128(result.add(i).cast(), _mm_sub_epi8(va, vb));
        i += LANES;
    }

    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_sub(*b.add(j));
    }
}

/// 16 signed bytes → 4 lanes of pairwise i32 products
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn madd_i8(va: __m128i, vb: __m128i) -> __m128i {
    // Interleaving a byte with itself then shifting right arithmetically by 8
    // sign-extends it to 16 bits.
    let a_lo = _mm_srai_epi16(_mm_unpacklo_epi8(va, va), 8);
    let a_hi = _mm_srai_epi16(_mm_unpackhi_epi8(va, va), 8);
    let b_lo = _mm_srai_epi16(_mm_unpacklo_epi8(vb, vb), 8);
    let b_hi = _mm_srai_epi16(_mm_unpackhi_epi8(vb, vb), 8);
    _mm_add_epi32(_mm_madd_epi16(a_lo, b_lo), _mm_madd_epi16(a_hi, b_hi))
}

/// 16 unsigned bytes → 4 lanes of pairwise products
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn madd_u8(va: __m128i, vb: __m128i) -> __m128i {
    let zero = _mm_setzero_si128();
    let a_lo = _mm_unpacklo_epi8(va, zero);
    let a_hi = _mm_unpackhi_epi8(va, zero);
    let b_lo = _mm_unpacklo_epi8(vb, zero);
    let b_hi = _mm_unpackhi_epi8(vb, zero);
    _mm_add_epi32(_mm_madd_epi16(a_lo, b_lo), _mm_madd_epi16(a_hi, b_hi))
}

/// Wrapping horizontal sum of 4 i32 lanes
#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn hsum_epi32(v: __m128i) -> i32 {
    let mut lanes = [0i32; 4];
    _mm_storeu_si128(lanes.as_mut_ptr().cast(), v);
    lanes.iter().fold(0i32, |acc, &x| acc.wrapping_add(x))
}

#[target_feature(enable = "sse2")]
unsafe fn dot_i8_unrolled<const UNROLL: usize>(a: &[i8], b: &[i8]) -> i32 {
    let len = a.len();
    let step = LANES * UNROLL;
    let mut i = 0;

    // Independent accumulators per unrolled block
    let mut acc = [_mm_setzero_si128(); UNROLL];

    while i + step <= len {
        for (u, lane_acc) in acc.iter_mut().enumerate() {
            let offset = i + u * LANES;
            let va = _mm_loadu_si128(a.as_ptr().add(offset).cast());
            let vb = _mm_loadu_si128(b.as_ptr().add(offset).cast());
            *lane_acc = _mm_add_epi32(*lane_acc, madd_i8(va, vb));
        }
        i += step;
    }

    let mut combined = _mm_setzero_si128();
    for v in acc {
        combined = _mm_add_epi32(combined, v);
    }
    let sum = hsum_epi32(combined);

    sum.wrapping_add(dot_i8_ref(&a[i..], &b[i..]))
}

#[target_feature(enable = "sse2")]
unsafe fn dot_u8_unrolled<const UNROLL: usize>(a: &[u8], b: &[u8]) -> u32 {
    let len = a.len();
    let step = LANES * UNROLL;
    let mut i = 0;

    let mut acc = [_mm_setzero_si128(); UNROLL];

    while i + step <= len {
        for (u, lane_acc) in acc.iter_mut().enumerate() {
            let offset = i + u * LANES;
            let va = _mm_loadu_si128(a.as_ptr().add(offset).cast());
            let vb = _mm_loadu_si128(b.as_ptr().add(offset).cast());
            *lane_acc = _mm_add_epi32(*lane_acc, madd_u8(va, vb));
        }
        i += step;
    }

    let mut combined = _mm_setzero_si128();
    for v in acc {
        combined = _mm_add_epi32(combined, v);
    }
    // Lanes hold the low 32 bits of the unsigned sums
    let sum = hsum_epi32(combined) as u32;

    sum.wrapping_add(dot_u8_ref(&a[i..], &b[i..]))
}
