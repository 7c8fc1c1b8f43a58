//! Kernel tier selection and backend dispatch
//!
//! Dot products are computed by one of three kernel variants. Each variant
//! processes 16, 32 or 64 bytes per main-loop iteration, and the unroll factor
//! decides the shortest input for which it pays off. The tier is picked from
//! the operand length alone:
//!
//! ```text
//! Tier   Lanes  Length range
//! ─────  ─────  ────────────
//! W16    16     1 ..= 31
//! W32    32     32 ..= 63
//! W64    64     64 ..
//! ```
//!
//! Every tier kernel is still correct for any length: whatever does not fill
//! a full iteration is processed one element at a time. Add and subtract are
//! not tiered.

use std::fmt;

use crate::backends::scalar::ScalarBackend;
#[cfg(target_arch = "x86_64")]
use crate::backends::{avx2::Avx2Backend, avx512::Avx512Backend, sse2::Sse2Backend};
#[cfg(target_arch = "aarch64")]
use crate::backends::neon::NeonBackend;
use crate::{Backend, Element, Result, Simd8Error};

/// Smallest length served by the 32-lane kernel
pub const W32_MIN_LEN: usize = 32;

/// Smallest length served by the 64-lane kernel
pub const W64_MIN_LEN: usize = 64;

/// Vectorized dot-product kernel variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KernelTier {
    /// 16 bytes per iteration, lengths below 32
    W16,
    /// 32 bytes per iteration, lengths 32 to 63
    W32,
    /// 64 bytes per iteration, lengths 64 and up
    W64,
}

impl KernelTier {
    /// All tiers in ascending length order
    pub const ALL: [KernelTier; 3] = [KernelTier::W16, KernelTier::W32, KernelTier::W64];

    /// Select the kernel tier for an operand length
    ///
    /// # Examples
    ///
    /// ```
    /// use simd8::KernelTier;
    ///
    /// assert_eq!(KernelTier::select(31), KernelTier::W16);
    /// assert_eq!(KernelTier::select(32), KernelTier::W32);
    /// assert_eq!(KernelTier::select(64), KernelTier::W64);
    /// ```
    pub const fn select(len: usize) -> Self {
        if len < W32_MIN_LEN {
            KernelTier::W16
        } else if len < W64_MIN_LEN {
            KernelTier::W32
        } else {
            KernelTier::W64
        }
    }

    /// Human-readable variant name
    pub const fn name(self) -> &'static str {
        match self {
            KernelTier::W16 => "width-16",
            KernelTier::W32 => "width-32",
            KernelTier::W64 => "width-64",
        }
    }

    /// Bytes consumed per main-loop iteration
    pub const fn lanes(self) -> usize {
        match self {
            KernelTier::W16 => 16,
            KernelTier::W32 => 32,
            KernelTier::W64 => 64,
        }
    }

    /// Smallest length this tier is selected for
    pub const fn min_len(self) -> usize {
        match self {
            KernelTier::W16 => 1,
            KernelTier::W32 => W32_MIN_LEN,
            KernelTier::W64 => W64_MIN_LEN,
        }
    }

    /// Largest length this tier is selected for (`None` = unbounded)
    pub const fn max_len(self) -> Option<usize> {
        match self {
            KernelTier::W16 => Some(W32_MIN_LEN - 1),
            KernelTier::W32 => Some(W64_MIN_LEN - 1),
            KernelTier::W64 => None,
        }
    }

    /// Whether `len` falls inside this tier's applicability range
    pub const fn covers(self, len: usize) -> bool {
        if len < self.min_len() {
            return false;
        }
        match self.max_len() {
            Some(max) => len <= max,
            None => true,
        }
    }
}

impl fmt::Display for KernelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run `$body` with `$B` bound to the backend type for `$backend`
///
/// `Auto` and backends not compiled for this architecture bind the scalar
/// backend; callers resolve and availability-check the backend beforehand.
macro_rules! with_backend {
    ($backend:expr, $B:ident => $body:expr) => {
        match $backend {
            #[cfg(target_arch = "x86_64")]
            Backend::SSE2 => {
                type $B = Sse2Backend;
                $body
            }
            #[cfg(target_arch = "x86_64")]
            Backend::AVX2 => {
                type $B = Avx2Backend;
                $body
            }
            #[cfg(target_arch = "x86_64")]
            Backend::AVX512 => {
                type $B = Avx512Backend;
                $body
            }
            #[cfg(target_arch = "aarch64")]
            Backend::NEON => {
                type $B = NeonBackend;
                $body
            }
            _ => {
                type $B = ScalarBackend;
                $body
            }
        }
    };
}

/// Element-wise addition on a resolved backend
///
/// # Safety
///
/// `backend` must be available on this CPU, `a.len() == b.len()` and
/// `result.len() >= a.len()`.
pub(crate) unsafe fn add_on<T: Element>(backend: Backend, a: &[T], b: &[T], result: &mut [T]) {
    with_backend!(backend, B => T::add_on::<B>(a, b, result))
}

/// Element-wise subtraction on a resolved backend
///
/// # Safety
///
/// Same contract as [`add_on`].
pub(crate) unsafe fn sub_on<T: Element>(backend: Backend, a: &[T], b: &[T], result: &mut [T]) {
    with_backend!(backend, B => T::sub_on::<B>(a, b, result))
}

/// Dot product on a resolved backend with an explicit tier
///
/// # Safety
///
/// `backend` must be available on this CPU and `a.len() == b.len()`.
pub(crate) unsafe fn dot_on<T: Element>(
    backend: Backend,
    tier: KernelTier,
    a: &[T],
    b: &[T],
) -> T::Acc {
    with_backend!(backend, B => T::dot_on::<B>(tier, a, b))
}

/// Dot product with a caller-chosen tier, bypassing length-based selection
///
/// Exposes each kernel variant directly so it can be checked against the
/// scalar reference over lengths outside its own tier. Empty operands are
/// accepted and yield zero.
///
/// # Errors
///
/// - [`Simd8Error::LengthMismatch`] if the slices differ in length
/// - [`Simd8Error::UnsupportedBackend`] if `backend` cannot run on this CPU
///
/// # Examples
///
/// ```
/// use simd8::{kernel, Backend, KernelTier};
///
/// let a = [3i8; 100];
/// let b = [-2i8; 100];
/// for tier in KernelTier::ALL {
///     assert_eq!(kernel::dot_with_tier(Backend::Auto, tier, &a, &b).unwrap(), -600);
/// }
/// ```
pub fn dot_with_tier<T: Element>(
    backend: Backend,
    tier: KernelTier,
    a: &[T],
    b: &[T],
) -> Result<T::Acc> {
    if a.len() != b.len() {
        return Err(Simd8Error::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let backend = backend.resolve();
    if !backend.is_available() {
        return Err(Simd8Error::UnsupportedBackend(backend));
    }
    // SAFETY: backend availability and equal lengths verified above
    Ok(unsafe { dot_on(backend, tier, a, b) })
}
