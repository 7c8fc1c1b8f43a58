//! Alignment independence
//!
//! Operands are carved out of a buffer at odd offsets from a 64-byte boundary,
//! so no SIMD load ever starts on a register-aligned address. Results must
//! still match the scalar reference exactly.

use simd8::backends::scalar;
use simd8::{kernel, ops, Backend, ComputeConfig, KernelTier};

const OFFSETS: [usize; 10] = [0, 1, 2, 3, 5, 7, 11, 13, 15, 63];
const LENGTHS: [usize; 10] = [1, 15, 16, 17, 31, 32, 33, 63, 64, 65];

fn available_backends() -> Vec<Backend> {
    [
        Backend::Scalar,
        Backend::SSE2,
        Backend::AVX2,
        Backend::AVX512,
        Backend::NEON,
    ]
    .into_iter()
    .filter(|b| b.is_available())
    .collect()
}

/// Buffer with room for `len` bytes after any offset, plus the index of its
/// first 64-byte aligned byte
fn aligned_buffer(len: usize, seed: u8) -> (Vec<u8>, usize) {
    let buf: Vec<u8> = (0..len + 64 + 64)
        .map(|i| (i as u8).wrapping_mul(37).wrapping_add(seed))
        .collect();
    let base = buf.as_ptr().align_offset(64);
    assert!(base < 64);
    (buf, base)
}

#[test]
fn test_dot_u8_at_offsets() {
    for len in LENGTHS {
        let (buf_a, base_a) = aligned_buffer(len, 3);
        let (buf_b, base_b) = aligned_buffer(len, 200);

        for offset in OFFSETS {
            let a = &buf_a[base_a + offset..base_a + offset + len];
            let b = &buf_b[base_b + offset..base_b + offset + len];
            let expected = scalar::dot(a, b).unwrap();

            for backend in available_backends() {
                for tier in KernelTier::ALL {
                    let got = kernel::dot_with_tier(backend, tier, a, b).unwrap();
                    assert_eq!(got, expected, "{backend:?} {tier} len={len} offset={offset}");
                }
            }
        }
    }
}

#[test]
fn test_dot_i8_mixed_offsets() {
    // a and b misaligned by different amounts
    for len in LENGTHS {
        let signed_a: Vec<i8> = aligned_buffer(len, 91).0.iter().map(|&x| x as i8).collect();
        let signed_b: Vec<i8> = aligned_buffer(len, 17).0.iter().map(|&x| x as i8).collect();
        let sa = signed_a.as_ptr().align_offset(64);
        let sb = signed_b.as_ptr().align_offset(64);

        for (off_a, off_b) in OFFSETS.iter().zip(OFFSETS.iter().rev()) {
            let a = &signed_a[sa + off_a..sa + off_a + len];
            let b = &signed_b[sb + off_b..sb + off_b + len];
            let expected = scalar::dot(a, b).unwrap();

            for backend in available_backends() {
                let config = ComputeConfig::new().with_backend(backend);
                let got = ops::dot_with(&config, a, b).unwrap();
                assert_eq!(got, expected, "{backend:?} len={len} offsets=({off_a},{off_b})");
            }
        }
    }
}

#[test]
fn test_add_sub_at_offsets() {
    for len in LENGTHS.into_iter().chain([100, 129]) {
        let (buf_a, base_a) = aligned_buffer(len, 250);
        let (buf_b, base_b) = aligned_buffer(len, 9);

        for offset in OFFSETS {
            let a = &buf_a[base_a + offset..base_a + offset + len];
            let b = &buf_b[base_b + offset..base_b + offset + len];
            let add_ref = scalar::add(a, b).unwrap();
            let sub_ref = scalar::sub(a, b).unwrap();

            for backend in available_backends() {
                let config = ComputeConfig::new().with_backend(backend);
                assert_eq!(ops::add_with(&config, a, b).unwrap(), add_ref);
                assert_eq!(ops::sub_with(&config, a, b).unwrap(), sub_ref);
            }
        }
    }
}
