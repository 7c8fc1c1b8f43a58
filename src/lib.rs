//! simd8: 8-bit Integer Vector Arithmetic with Width-Tiered SIMD Kernels
//!
//! **simd8** provides elementwise add/subtract, dot product and matrix
//! multiplication over `i8` and `u8` vectors with two interchangeable
//! execution paths:
//!
//! 1. **Scalar** - portable reference loops, the source of truth for correctness
//! 2. **SIMD** - x86_64 (SSE2/AVX2/AVX-512BW) and aarch64 (NEON) kernels
//!
//! # Design Principles
//!
//! - **Bit-exact equivalence**: every SIMD kernel matches the scalar reference
//!   for every length and every operand alignment
//! - **Length-tiered dispatch**: dot products pick a 16, 32 or 64 byte kernel
//!   from the operand length (see [`KernelTier`])
//! - **Runtime dispatch**: auto-select the best backend from CPU features
//! - **Zero unsafe in public API**: `unsafe` stays inside `backends` and the
//!   internal dispatch in `kernel`
//! - **Recoverable errors**: shape violations are reported, never panicked on
//!
//! # Quick Start
//!
//! ```rust
//! use simd8::Vector;
//!
//! let a = Vector::from_slice(&[1i8, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
//! let b = Vector::from_slice(&[1i8, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
//!
//! assert_eq!(a.dot(&b).unwrap(), 385);
//!
//! // Add and subtract wrap like native fixed-width integers
//! let x = Vector::from_slice(&[127i8]);
//! let y = Vector::from_slice(&[1i8]);
//! assert_eq!(x.add(&y).unwrap().as_slice(), &[-128]);
//! ```

pub mod backends;
pub mod config;
pub mod element;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod ops;
pub mod vector;

pub use config::{ComputeConfig, OverflowPolicy};
pub use element::Element;
pub use error::{Result, Simd8Error};
pub use kernel::KernelTier;
pub use matrix::Matrix;
pub use ops::{add, dot, sub};
pub use vector::Vector;

/// Backend execution target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Scalar reference (no SIMD)
    Scalar,
    /// SSE2 (x86_64 baseline, 128-bit)
    SSE2,
    /// AVX2 (256-bit)
    AVX2,
    /// AVX-512 with byte/word instructions (512-bit)
    AVX512,
    /// ARM NEON (128-bit)
    NEON,
    /// Auto-select best available
    #[default]
    Auto,
}

impl Backend {
    /// Select the best available backend for the current platform
    ///
    /// This is a convenience wrapper around `select_best_available_backend()`
    pub fn select_best() -> Self {
        select_best_available_backend()
    }

    /// Resolve `Auto` to a concrete backend, leaving any other value untouched
    pub fn resolve(self) -> Self {
        match self {
            Backend::Auto => select_best_available_backend(),
            other => other,
        }
    }

    /// Whether the running CPU can execute this backend's kernels
    ///
    /// `Scalar` and `Auto` are always available.
    ///
    /// # Examples
    ///
    /// ```
    /// use simd8::Backend;
    ///
    /// assert!(Backend::Scalar.is_available());
    /// assert!(Backend::select_best().is_available());
    /// ```
    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar | Backend::Auto => true,
            #[cfg(target_arch = "x86_64")]
            Backend::SSE2 => is_x86_feature_detected!("sse2"),
            #[cfg(target_arch = "x86_64")]
            Backend::AVX2 => is_x86_feature_detected!("avx2"),
            #[cfg(target_arch = "x86_64")]
            Backend::AVX512 => {
                is_x86_feature_detected!("avx512f")
                    && is_x86_feature_detected!("avx512bw")
                    && is_x86_feature_detected!("avx2")
            }
            #[cfg(target_arch = "aarch64")]
            Backend::NEON => std::arch::is_aarch64_feature_detected!("neon"),
            #[allow(unreachable_patterns)]
            _ => false,
        }
    }
}

/// Detect best SIMD backend for x86_64 platforms
#[cfg(target_arch = "x86_64")]
fn detect_x86_backend() -> Backend {
    if Backend::AVX512.is_available() {
        return Backend::AVX512;
    }
    if is_x86_feature_detected!("avx2") {
        return Backend::AVX2;
    }
    if is_x86_feature_detected!("sse2") {
        return Backend::SSE2;
    }
    Backend::Scalar
}

/// Detect best SIMD backend for aarch64 platforms
#[cfg(target_arch = "aarch64")]
fn detect_arm_backend() -> Backend {
    if std::arch::is_aarch64_feature_detected!("neon") {
        Backend::NEON
    } else {
        Backend::Scalar
    }
}

/// Select the best available backend for the current platform
///
/// This function performs runtime CPU feature detection and selects the most
/// optimized backend available. The selection follows this priority:
///
/// **x86_64**:
/// 1. AVX-512 (if `avx512f` and `avx512bw` are detected)
/// 2. AVX2
/// 3. SSE2 (baseline for x86_64)
///
/// **aarch64**: NEON
///
/// **Other platforms**: Scalar
///
/// # Examples
///
/// ```
/// use simd8::select_best_available_backend;
///
/// let backend = select_best_available_backend();
/// println!("Using backend: {:?}", backend);
/// ```
pub fn select_best_available_backend() -> Backend {
    #[cfg(target_arch = "x86_64")]
    {
        detect_x86_backend()
    }

    #[cfg(target_arch = "aarch64")]
    {
        detect_arm_backend()
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        Backend::Scalar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_enum() {
        assert_eq!(Backend::Scalar, Backend::Scalar);
        assert_ne!(Backend::Scalar, Backend::AVX2);
    }

    #[test]
    fn test_select_best_available_backend() {
        let backend = select_best_available_backend();

        #[cfg(target_arch = "x86_64")]
        {
            // SSE2 is part of the x86_64 baseline
            assert!(matches!(
                backend,
                Backend::SSE2 | Backend::AVX2 | Backend::AVX512
            ));
        }

        #[cfg(target_arch = "aarch64")]
        {
            assert_eq!(backend, Backend::NEON);
        }

        assert_ne!(backend, Backend::Auto);
        assert!(backend.is_available());
    }

    #[test]
    fn test_backend_selection_is_deterministic() {
        let backend1 = select_best_available_backend();
        let backend2 = select_best_available_backend();
        assert_eq!(backend1, backend2);
    }

    #[test]
    fn test_resolve_auto() {
        assert_eq!(Backend::Auto.resolve(), select_best_available_backend());
        assert_eq!(Backend::Scalar.resolve(), Backend::Scalar);
        assert_eq!(Backend::AVX2.resolve(), Backend::AVX2);
    }

    #[test]
    fn test_foreign_backends_unavailable() {
        #[cfg(target_arch = "x86_64")]
        assert!(!Backend::NEON.is_available());

        #[cfg(target_arch = "aarch64")]
        {
            assert!(!Backend::SSE2.is_available());
            assert!(!Backend::AVX2.is_available());
            assert!(!Backend::AVX512.is_available());
        }
    }
}
