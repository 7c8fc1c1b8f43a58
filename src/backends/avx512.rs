//! AVX-512 backend implementation (x86_64 maximum SIMD)
//!
//! Uses 512-bit registers for the long-operand tier. Byte and word
//! instructions (`vpaddb`, `vpmovsxbw`, `vpmaddwd` on zmm) require AVX-512BW
//! on top of AVX-512F; [`crate::Backend::AVX512`] is only reported available
//! when both are present (plus AVX2, which the shorter tiers reuse).
//!
//! # Kernels
//!
//! - add/sub: 64 bytes per iteration
//! - dot W16: SSE2 kernel
//! - dot W32: AVX2 kernel
//! - dot W64: one 512-bit register per iteration

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::avx2::Avx2Backend;
use super::scalar::{dot_i8_ref, dot_u8_ref};
use super::sse2::Sse2Backend;
use super::VectorBackend;
use crate::KernelTier;

const LANES: usize = 64;

/// AVX-512 backend (512-bit SIMD for x86_64)
pub struct Avx512Backend;

impl VectorBackend for Avx512Backend {
    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn add_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        add_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn sub_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        sub_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn add_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        add_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn sub_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        sub_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn dot_i8(tier: KernelTier, a: &[i8], b: &[i8]) -> i32 {
        match tier {
            KernelTier::W16 => Sse2Backend::dot_i8(KernelTier::W16, a, b),
            KernelTier::W32 => Avx2Backend::dot_i8(KernelTier::W32, a, b),
            KernelTier::W64 => dot_i8_zmm(a, b),
        }
    }

    #[target_feature(enable = "avx512f,avx512bw")]
    unsafe fn dot_u8(tier: KernelTier, a: &[u8], b: &[u8]) -> u32 {
        match tier {
            KernelTier::W16 => Sse2Backend::dot_u8(KernelTier::W16, a, b),
            KernelTier::W32 => Avx2Backend::dot_u8(KernelTier::W32, a, b),
            KernelTier::W64 => dot_u8_zmm(a, b),
        }
    }
}

#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn add_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = _mm512_loadu_si512(a.add(i).cast());
        let vb = _mm512_loadu_si512(b.add(i).cast());
        _mm512_storeu_si512(result.add(i).cast(), _mm512_add_epi8(va, vb));
        i += LANES;
    }

    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_add(*b.add(j));
    }
}

#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn sub_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = _mm512_loadu_si512(a.add(i).cast());
        let vb = _mm512_loadu_si512(b.add(i).cast());
        _mm512_storeu_si512(result.add(i).cast(), _mm512_sub_epi8(va, vb));
        i += LANES;
    }

    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_sub(*b.add(j));
    }
}

#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn dot_i8_zmm(a: &[i8], b: &[i8]) -> i32 {
    let len = a.len();
    let mut i = 0;
    let mut acc = _mm512_setzero_si512();

    while i + LANES <= len {
        let va = _mm512_loadu_si512(a.as_ptr().add(i).cast());
        let vb = _mm512_loadu_si512(b.as_ptr().add(i).cast());

        let a_lo = _mm512_cvtepi8_epi16(_mm512_castsi512_si256(va));
        let a_hi = _mm512_cvtepi8_epi16(_mm512_extracti64x4_epi64(va, 1));
        let b_lo = _mm512_cvtepi8_epi16(_mm512_castsi512_si256(vb));
        let b_hi = _mm512_cvtepi8_epi16(_mm512_extracti64x4_epi64(vb, 1));

        acc = _mm512_add_epi32(acc, _mm512_madd_epi16(a_lo, b_lo));
        acc = _mm512_add_epi32(acc, _mm512_madd_epi16(a_hi, b_hi));
        i += LANES;
    }

    // Integer lane reduction wraps like the scalar accumulator
    let sum = _mm512_reduce_add_epi32(acc);

    sum.wrapping_add(dot_i8_ref(&a[i..], &b[i..]))
}

#[target_feature(enable = "avx512f,avx512bw")]
unsafe fn dot_u8_zmm(a: &[u8], b: &[u8]) -> u32 {
    let len = a.len();
    let mut i = 0;
    let mut acc = _mm512_setzero_si512();

    while i + LANES <= len {
        let va = _mm512_loadu_si512(a.as_ptr().add(i).cast());
        let vb = _mm512_loadu_si512(b.as_ptr().add(i).cast());

        let a_lo = _mm512_cvtepu8_epi16(_mm512_castsi512_si256(va));
        let a_hi = _mm512_cvtepu8_epi16(_mm512_extracti64x4_epi64(va, 1));
        let b_lo = _mm512_cvtepu8_epi16(_mm512_castsi512_si256(vb));
        let b_hi = _mm512_cvtepu8_epi16(_mm512_extracti64x4_epi64(vb, 1));

        acc = _mm512_add_epi32(acc, _mm512_madd_epi16(a_lo, b_lo));
        acc = _mm512_add_epi32(acc, _mm512_madd_epi16(a_hi, b_hi));
        i += LANES;
    }

    let sum = _mm512_reduce_add_epi32(acc) as u32;

    sum.wrapping_add(dot_u8_ref(&a[i..], &b[i..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scalar::ScalarBackend;
    use crate::Backend;

    #[test]
    fn test_avx512_add_sub_match_scalar() {
        if !Backend::AVX512.is_available() {
            eprintln!("Skipping AVX-512 test: CPU does not support AVX-512BW");
            return;
        }

        let a: Vec<i8> = (0..200).map(|i| ((i * 91) % 256) as u8 as i8).collect();
        let b: Vec<i8> = (0..200).map(|i| ((i * 13 + 5) % 256) as u8 as i8).collect();

        for len in [1, 63, 64, 65, 127, 128, 200] {
            let mut got = vec![0i8; len];
            let mut expected = vec![0i8; len];
            unsafe {
                Avx512Backend::add_i8(&a[..len], &b[..len], &mut got);
                ScalarBackend::add_i8(&a[..len], &b[..len], &mut expected);
            }
            assert_eq!(got, expected, "add len={len}");

            unsafe {
                Avx512Backend::sub_i8(&a[..len], &b[..len], &mut got);
                ScalarBackend::sub_i8(&a[..len], &b[..len], &mut expected);
            }
            assert_eq!(got, expected, "sub len={len}");
        }
    }

    #[test]
    fn test_avx512_dot_matches_scalar() {
        if !Backend::AVX512.is_available() {
            eprintln!("Skipping AVX-512 test: CPU does not support AVX-512BW");
            return;
        }

        let a: Vec<i8> = (0..400).map(|i| ((i * 59 + 3) % 256) as u8 as i8).collect();
        let b: Vec<i8> = (0..400).map(|i| ((i * 211) % 256) as u8 as i8).collect();

        for len in 0..a.len() {
            let expected = unsafe { ScalarBackend::dot_i8(KernelTier::W64, &a[..len], &b[..len]) };
            for tier in KernelTier::ALL {
                let got = unsafe { Avx512Backend::dot_i8(tier, &a[..len], &b[..len]) };
                assert_eq!(got, expected, "tier={tier} len={len}");
            }
        }
    }

    #[test]
    fn test_avx512_dot_u8_extremes() {
        if !Backend::AVX512.is_available() {
            eprintln!("Skipping AVX-512 test: CPU does not support AVX-512BW");
            return;
        }

        let u = vec![255u8; 1000];
        assert_eq!(
            unsafe { Avx512Backend::dot_u8(KernelTier::W64, &u, &u) },
            1000 * 65025
        );
    }
}
