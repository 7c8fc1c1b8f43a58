//! NEON backend implementation (aarch64 SIMD)
//!
//! 128-bit registers, 16 bytes each. The three dot tiers unroll 1, 2 or 4
//! registers per iteration with independent accumulators.
//!
//! Products are formed with widening multiplies (`smull`/`umull`), which fit
//! 16 bits for both element types (128 * 128 and 255 * 255), then folded into
//! 32-bit lanes with pairwise add-accumulate (`sadalp`/`uadalp`).

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use super::scalar::{dot_i8_ref, dot_u8_ref};
use super::VectorBackend;
use crate::KernelTier;

const LANES: usize = 16;

/// NEON backend (128-bit SIMD for aarch64)
pub struct NeonBackend;

impl VectorBackend for NeonBackend {
    #[target_feature(enable = "neon")]
    unsafe fn add_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        add_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "neon")]
    unsafe fn sub_i8(a: &[i8], b: &[i8], result: &mut [i8]) {
        sub_bytes(a.as_ptr().cast(), b.as_ptr().cast(), result.as_mut_ptr().cast(), a.len());
    }

    #[target_feature(enable = "neon")]
    unsafe fn add_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        add_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "neon")]
    unsafe fn sub_u8(a: &[u8], b: &[u8], result: &mut [u8]) {
        sub_bytes(a.as_ptr(), b.as_ptr(), result.as_mut_ptr(), a.len());
    }

    #[target_feature(enable = "neon")]
    unsafe fn dot_i8(tier: KernelTier, a: &[i8], b: &[i8]) -> i32 {
        match tier {
            KernelTier::W16 => dot_i8_unrolled::<1>(a, b),
            KernelTier::W32 => dot_i8_unrolled::<2>(a, b),
            KernelTier::W64 => dot_i8_unrolled::<4>(a, b),
        }
    }

    #[target_feature(enable = "neon")]
    unsafe fn dot_u8(tier: KernelTier, a: &[u8], b: &[u8]) -> u32 {
        match tier {
            KernelTier::W16 => dot_u8_unrolled::<1>(a, b),
            KernelTier::W32 => dot_u8_unrolled::<2>(a, b),
            KernelTier::W64 => dot_u8_unrolled::<4>(a, b),
        }
    }
}

#[target_feature(enable = "neon")]
unsafe fn add_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = vld1q_u8(a.add(i));
        let vb = vld1q_u8(b.add(i));
        vst1q_u8(result.add(i), vaddq_u8(va, vb));
        i += LANES;
    }

    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_add(*b.add(j));
    }
}

#[target_feature(enable = "neon")]
unsafe fn sub_bytes(a: *const u8, b: *const u8, result: *mut u8, len: usize) {
    let mut i = 0;

    while i + LANES <= len {
        let va = vld1q_u8(a.add(i));
        let vb = vld1q_u8(b.add(i));
        vst1q_u8(result.add(i), vsubq_u8(va, vb));
        i += LANES;
    }

    for j in i..len {
        *result.add(j) = (*a.add(j)).wrapping_sub(*b.add(j));
    }
}

#[target_feature(enable = "neon")]
unsafe fn dot_i8_unrolled<const UNROLL: usize>(a: &[i8], b: &[i8]) -> i32 {
    let len = a.len();
    let step = LANES * UNROLL;
    let mut i = 0;

    let mut acc = [vdupq_n_s32(0); UNROLL];

    while i + step <= len {
        for (u, lane_acc) in acc.iter_mut().enumerate() {
            let offset = i + u * LANES;
            let va = vld1q_s8(a.as_ptr().add(offset));
            let vb = vld1q_s8(b.as_ptr().add(offset));
            let prod_lo = vmull_s8(vget_low_s8(va), vget_low_s8(vb));
            let prod_hi = vmull_high_s8(va, vb);
            *lane_acc = vpadalq_s16(vpadalq_s16(*lane_acc, prod_lo), prod_hi);
        }
        i += step;
    }

    let mut combined = vdupq_n_s32(0);
    for v in acc {
        combined = vaddq_s32(combined, v);
    }
    let mut lanes = [0i32; 4];
    vst1q_s32(lanes.as_mut_ptr(), combined);
    let sum = lanes.iter().fold(0i32, |s, &x| s.wrapping_add(x));

    sum.wrapping_add(dot_i8_ref(&a[i..], &b[i..]))
}

#[target_feature(enable = "neon")]
unsafe fn dot_u8_unrolled<const UNROLL: usize>(a: &[u8], b: &[u8]) -> u32 {
    let len = a.len();
    let step = LANES * UNROLL;
    let mut i = 0;

    let mut acc = [vdupq_n_u32(0); UNROLL];

    while i + step <= len {
        for (u, lane_acc) in acc.iter_mut().enumerate() {
            let offset = i + u * LANES;
            let va = vld1q_u8(a.as_ptr().add(offset));
            let vb = vld1q_u8(b.as_ptr().add(offset));
            let prod_lo = vmull_u8(vget_low_u8(va), vget_low_u8(vb));
            let prod_hi = vmull_high_u8(va, vb);
            *lane_acc = vpadalq_u16(vpadalq_u16(*lane_acc, prod_lo), prod_hi);
        }
        i += step;
    }

    let mut combined = vdupq_n_u32(0);
    for v in acc {
        combined = vaddq_u32(combined, v);
    }
    let mut lanes = [0u32; 4];
    vst1q_u32(lanes.as_mut_ptr(), combined);
    let sum = lanes.iter().fold(0u32, |s, &x| s.wrapping_add(x));

    sum.wrapping_add(dot_u8_ref(&a[i..], &b[i..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::scalar::ScalarBackend;

    #[test]
    fn test_neon_add_wraps() {
        let a = vec![255u8; 35];
        let b = vec![1u8; 35];
        let mut result = vec![7u8; 35];

        unsafe {
            NeonBackend::add_u8(&a, &b, &mut result);
        }

        assert_eq!(result, vec![0u8; 35]);
    }

    #[test]
    fn test_neon_dot_extremes() {
        let a = vec![-128i8; 100];
        let c = vec![127i8; 100];
        for tier in KernelTier::ALL {
            assert_eq!(unsafe { NeonBackend::dot_i8(tier, &a, &a) }, 100 * 16384);
            assert_eq!(unsafe { NeonBackend::dot_i8(tier, &a, &c) }, -100 * 16256);
        }
    }

    #[test]
    fn test_neon_matches_scalar() {
        let a: Vec<u8> = (0..260).map(|i| ((i * 83 + 1) % 256) as u8).collect();
        let b: Vec<u8> = (0..260).map(|i| ((i * 47 + 128) % 256) as u8).collect();

        for len in 0..a.len() {
            let expected = unsafe { ScalarBackend::dot_u8(KernelTier::W16, &a[..len], &b[..len]) };
            for tier in KernelTier::ALL {
                let got = unsafe { NeonBackend::dot_u8(tier, &a[..len], &b[..len]) };
                assert_eq!(got, expected, "tier={tier} len={len}");
            }
        }
    }
}
