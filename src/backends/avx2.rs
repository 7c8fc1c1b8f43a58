//! AVX2 backend implementation (x86_64 advanced SIMD)
//!
//! This backend uses AVX2 intrinsics for 256-bit SIMD operations.
//!
//! # Kernels
//!
//! - add/sub: 32 bytes per iteration
//! - dot W16: delegates to the SSE2 16-byte kernel (a 256-bit register would
//!   never fill for the lengths this tier serves)
//! - dot W32: one 256-bit register per iteration
//! - dot W64: two 256-bit registers per iteration, independent accumulators
//!
//! Widening uses `vpmovsxbw`/`vpmovzxbw` followed by `vpmaddwd`.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::scalar::{dot_i8_ref, dot_u8_ref};
use super::sse2::{hsum_epi32, Sse2Backend};
use super::VectorBackend;
use crate::KernelTier;

const LANES: usize = 32;

/// AVX2 backend (256-bit SIMD for x86_64)
pub struct Avx2Backend;

impl VectorBackend for Avx2Backend {
    #[target_feature(enable = "avx2")]
    unsafe fn add_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        add_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "avx2")]
    unsafe fn sub_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        sub_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "avx2")]
    unsafe fn add_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        add_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "avx2")]
    unsafe fn sub_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        sub_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "avx2")]
    unsafe fn dot_i8(tier: KernelTier, a: &[i8], b: &[i8]) -> i32 {
        match tier {
            KernelTier::W16 => Sse2Backend::dot_i8(KernelTier::W16, a, b),
            KernelTier::W32 => dot_i8_unrolled::<1>(a, b),
            KernelTier::W64 => dot_i8_unrolled::<2>(a, b),
        }
    }

    #[target_feature(enable = "avx2")]
    unsafe fn dot_u8(tier: KernelTier, a: &[u8], b: &[u8]) -> u32 {
        match tier {
            KernelTier::W16 => Sse2Backend::dot_u8(KernelTier::W16, a, b),
            KernelTier::W32 => dot_u8_unrolled::<1>(a, b),
            KernelTier::W64 => dot_u8_unrolled::<2>(a, b),
        }
    }
}

#[target_feature(enable = "avx2")]
unsafe fn add_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = _mm256_loadu_si256(a.add(i).cast());
        let vb = _mm256_loadu_si256(b.add(i).cast());
        _mm256_storeu_si256(result.add(i).cast(), _mm256_add_epi8(va, vb));
        i += LANES;
    }

    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_add(*b.add(j));
    }
}

#[target_feature(enable = "avx2")]
unsafe fn sub_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = _mm256_loadu_si256(a.add(i).cast());
        let vb = _mm256_loadu_si256(b.add(i).cast());
        _mm256_storeu_si256(result.add(i).cast(), _mm256_sub_epi8(va, vb));
        i += LANES;
    }

    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_sub(*b.add(j));
    }
}

/// 32 signed bytes → 8 lanes of pairwise i32 products
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn madd_i8(va: __m256i, vb: __m256i) -> __m256i {
    let a_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(va));
    let a_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256(va, 1));
    let b_lo = _mm256_cvtepi8_epi16(_mm256_castsi256_si128(vb));
    let b_hi = _mm256_cvtepi8_epi16(_mm256_extracti128_si256(vb, 1));
    _mm256_add_epi32(_mm256_madd_epi16(a_lo, b_lo), _mm256_madd_epi16(a_hi, b_hi))
}

/// 32 unsigned bytes → 8 lanes of pairwise products
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn madd_u8(va: __m256i, vb: __m256i) -> __m256i {
    let a_lo = _mm256_cvtepu8_epi16(_mm256_castsi256_si128(va));
    let a_hi = _mm256_cvtepu8_epi16(_mm256_extracti128_si256(va, 1));
    let b_lo = _mm256_cvtepu8_epi16(_mm256_castsi256_si128(vb));
    let b_hi = _mm256_cvtepu8_epi16(_mm256_extracti128_si256(vb, 1));
    _mm256_add_epi32(_mm256_madd_epi16(a_lo, b_lo), _mm256_madd_epi16(a_hi, b_hi))
}

/// Wrapping horizontal sum of 8 i32 lanes
#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn hsum_epi32_256(v: __m256i) -> i32 {
    let lo = _mm256_castsi256_si128(v);
    let hi = _mm256_extracti128_si256(v, 1);
    hsum_epi32(_mm_add_epi32(lo, hi))
}

#[target_feature(enable = "avx2")]
unsafe fn dot_i8_unrolled<const UNROLL: usize>(a: &[i8], b: &[i8]) -> i32 {
    let len = a.len();
    let step = LANES * UNROLL;
    let mut i = 0;

    let mut acc = [_mm256_setzero_si256(); UNROLL];

    while i + step <= len {
        for (u, lane_acc) in acc.iter_mut().enumerate() {
            let offset = i + u * LANES;
            let va = _mm256_loadu_si256(a.as_ptr().add(offset).cast());
            let vb = _mm256_loadu_si256(b.as_ptr().add(offset).cast());
            *lane_acc = _mm256_add_epi32(*lane_acc, madd_i8(va, vb));
        }
        i += step;
    }

    let mut combined = _mm256_setzero_si256();
    for v in acc {
        combined = _mm256_add_epi32(combined, v);
    }
    let sum = hsum_epi32_256(combined);

    // Handle remaining elements with scalar code
    sum.wrapping_add(dot_i8_ref(&a[i..], &b[i..]))
}

#[target_feature(enable = "avx2")]
unsafe fn dot_u8_unrolled<const UNROLL: usize>(a: &[u8], b: &[u8]) -> u32 {
    let len = a.len();
    let step = LANES * UNROLL;
    let mut i = 0;

    let mut acc = [_mm256_setzero_si256(); UNROLL];

    while i + step <= len {
        for (u, lane_acc) in acc.iter_mut().enumerate() {
            let offset = i + u * LANES;
            let va = _mm256_loadu_si256(a.as_ptr().add(offset).cast());
            let vb = _mm256_loadu_si256(b.as_ptr().add(offset).cast());
            *lane_acc = _mm256_add_epi32(*lane_acc, madd_u8(va, vb));
        }
        i += step;
    }

    let mut combined = _mm256_setzero_si256();
    for v in acc {
        combined = _mm256_add_epi32(combined, v);
    }
    let sum = hsum_epi32_256(combined) as u32;

    sum.wrapping_add(dot_u8_ref(&a[i..], &b[i..]))
}
