//! Scalar/SIMD equivalence sweep
//!
//! Random operands at every length from 1 to 130 plus longer lengths around
//! each tier boundary, on every available backend and every kernel tier.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simd8::backends::scalar;
use simd8::{kernel, ops, Backend, ComputeConfig, KernelTier};

const EXTRA_LENGTHS: [usize; 11] = [15, 16, 17, 32, 33, 63, 64, 65, 100, 1000, 10000];

fn lengths() -> Vec<usize> {
    (1..=130).chain(EXTRA_LENGTHS).collect()
}

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

fn random_i8(rng: &mut StdRng, len: usize) -> Vec<i8> {
    (0..len).map(|_| rng.gen::<i8>()).collect()
}

fn random_u8(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen::<u8>()).collect()
}

#[test]
fn test_add_sub_equivalence_i8() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0001);

    for len in lengths() {
        let a = random_i8(&mut rng, len);
        let b = random_i8(&mut rng, len);
        let add_ref = scalar::add(&a, &b).unwrap();
        let sub_ref = scalar::sub(&a, &b).unwrap();

        for backend in available_backends() {
            let config = ComputeConfig::new().with_backend(backend);
            assert_eq!(ops::add_with(&config, &a, &b).unwrap(), add_ref, "{backend:?} len={len}");
            assert_eq!(ops::sub_with(&config, &a, &b).unwrap(), sub_ref, "{backend:?} len={len}");
        }
    }
}

#[test]
fn test_add_sub_equivalence_u8() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0002);

    for len in lengths() {
        let a = random_u8(&mut rng, len);
        let b = random_u8(&mut rng, len);
        let add_ref = scalar::add(&a, &b).unwrap();
        let sub_ref = scalar::sub(&a, &b).unwrap();

        for backend in available_backends() {
            let config = ComputeConfig::new().with_backend(backend);
            assert_eq!(ops::add_with(&config, &a, &b).unwrap(), add_ref, "{backend:?} len={len}");
            assert_eq!(ops::sub_with(&config, &a, &b).unwrap(), sub_ref, "{backend:?} len={len}");
        }
    }
}

#[test]
fn test_dot_equivalence_every_tier_i8() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0003);

    for len in lengths() {
        let a = random_i8(&mut rng, len);
        let b = random_i8(&mut rng, len);
        let expected = scalar::dot(&a, &b).unwrap();

        for backend in available_backends() {
            for tier in KernelTier::ALL {
                let got = kernel::dot_with_tier(backend, tier, &a, &b).unwrap();
                assert_eq!(got, expected, "{backend:?} {tier} len={len}");
            }
            let config = ComputeConfig::new().with_backend(backend);
            assert_eq!(ops::dot_with(&config, &a, &b).unwrap(), expected);
        }
    }
}

#[test]
fn test_dot_equivalence_every_tier_u8() {
    let mut rng = StdRng::seed_from_u64(0x5EED_0004);

    for len in lengths() {
        let a = random_u8(&mut rng, len);
        let b = random_u8(&mut rng, len);
        let expected = scalar::dot(&a, &b).unwrap();

        for backend in available_backends() {
            for tier in KernelTier::ALL {
                let got = kernel::dot_with_tier(backend, tier, &a, &b).unwrap();
                assert_eq!(got, expected, "{backend:?} {tier} len={len}");
            }
        }
    }
}

#[test]
fn test_dot_extremes_every_backend() {
    for len in [1, 31, 32, 64, 1000] {
        let min = vec![i8::MIN; len];
        let max = vec![i8::MAX; len];
        let full = vec![u8::MAX; len];

        for backend in available_backends() {
            let config = ComputeConfig::new().with_backend(backend);
            let n = len as i32;
            assert_eq!(ops::dot_with(&config, &min, &min).unwrap(), n * 16384);
            assert_eq!(ops::dot_with(&config, &min, &max).unwrap(), -n * 16256);
            assert_eq!(ops::dot_with(&config, &full, &full).unwrap(), len as u32 * 65025);
        }
    }
}

#[test]
fn test_wrapping_dot_matches_scalar_past_overflow() {
    // 255 * 255 * 70_000 exceeds u32::MAX
    let a = vec![255u8; 70_000];
    let expected = scalar::dot(&a, &a).unwrap();
    assert_eq!(expected, 70_000u32.wrapping_mul(65_025));

    for backend in available_backends() {
        let config = ComputeConfig::new().with_backend(backend);
        assert_eq!(ops::dot_with(&config, &a, &a).unwrap(), expected, "{backend:?}");
    }
}
