//! Backend Story Integration Tests
//!
//! Every public operation must run on every backend the CPU offers and agree
//! bit-for-bit with the scalar reference. A new operation that only works on
//! some backends fails here.

use simd8::{ops, Backend, ComputeConfig, Matrix, Simd8Error, Vector};

/// Backends this CPU can execute, scalar first
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

#[test]
fn test_best_backend_is_listed() {
    let backends = available_backends();
    assert_eq!(backends[0], Backend::Scalar);
    assert!(backends.contains(&Backend::select_best()));
}

#[test]
fn test_vector_ops_all_backends() {
    let a: Vec<i8> = (0..257).map(|i| ((i * 13 + 7) % 256) as u8 as i8).collect();
    let b: Vec<i8> = (0..257).map(|i| ((i * 31 + 100) % 256) as u8 as i8).collect();

    let scalar = ComputeConfig::scalar();
    let add_ref = ops::add_with(&scalar, &a, &b).expect("scalar add");
    let sub_ref = ops::sub_with(&scalar, &a, &b).expect("scalar sub");
    let dot_ref = ops::dot_with(&scalar, &a, &b).expect("scalar dot");

    for backend in available_backends() {
        let va = Vector::from_slice_with_backend(&a, backend);
        let vb = Vector::from_slice(&b);

        assert_eq!(va.add(&vb).unwrap().as_slice(), add_ref.as_slice(), "{backend:?}");
        assert_eq!(va.sub(&vb).unwrap().as_slice(), sub_ref.as_slice(), "{backend:?}");
        assert_eq!(va.dot(&vb).unwrap(), dot_ref, "{backend:?}");
        assert_eq!(va.dot_checked(&vb).unwrap(), dot_ref, "{backend:?}");
    }
}

#[test]
fn test_unsigned_ops_all_backends() {
    let a: Vec<u8> = (0..1000).map(|i| (i * 7 % 256) as u8).collect();
    let b: Vec<u8> = (0..1000).map(|i| (255 - i * 3 % 256) as u8).collect();

    let dot_ref = ops::dot_with(&ComputeConfig::scalar(), &a, &b).unwrap();
    for backend in available_backends() {
        let config = ComputeConfig::new().with_backend(backend);
        assert_eq!(ops::dot_with(&config, &a, &b).unwrap(), dot_ref, "{backend:?}");
    }
}

#[test]
fn test_matmul_all_backends() {
    let a = Matrix::from_vec(6, 40, (0..240).map(|i| (i % 256) as u8).collect()).unwrap();
    let b = Matrix::from_vec(40, 3, (0..120).map(|i| (i * 2 % 256) as u8).collect()).unwrap();

    let reference = a.matmul_with(&b, &ComputeConfig::scalar()).unwrap();
    for backend in available_backends() {
        let c = a.clone().with_backend(backend).matmul(&b).unwrap();
        assert_eq!(c.as_slice(), reference.as_slice(), "{backend:?}");
    }
}

#[test]
fn test_unavailable_backend_is_never_substituted() {
    let unavailable: Vec<Backend> = [Backend::SSE2, Backend::AVX2, Backend::AVX512, Backend::NEON]
        .into_iter()
        .filter(|b| !b.is_available())
        .collect();

    for backend in unavailable {
        let v = Vector::from_slice_with_backend(&[1u8, 2, 3], backend);
        assert_eq!(v.dot(&v), Err(Simd8Error::UnsupportedBackend(backend)));
        assert_eq!(v.add(&v), Err(Simd8Error::UnsupportedBackend(backend)));

        let m = Matrix::from_vec(1, 1, vec![1u8]).unwrap().with_backend(backend);
        assert_eq!(m.matmul(&m), Err(Simd8Error::UnsupportedBackend(backend)));
    }
}
