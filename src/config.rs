//! Compute configuration
//!
//! A [`ComputeConfig`] picks the backend that executes an operation and the
//! policy applied when a dot-product accumulator would overflow.
//!
//! # Examples
//!
//! ```
//! use simd8::{Backend, ComputeConfig, OverflowPolicy};
//!
//! // Defaults: auto-detected backend, wrapping accumulation
//! let config = ComputeConfig::default();
//! assert_eq!(config.backend, Backend::Auto);
//! assert_eq!(config.overflow, OverflowPolicy::Wrapping);
//!
//! // Scalar reference with overflow detection
//! let reference = ComputeConfig::scalar().with_overflow_policy(OverflowPolicy::Checked);
//! assert_eq!(reference.backend, Backend::Scalar);
//! ```

use crate::{Backend, Result, Simd8Error};

/// What a dot product does when its exact sum leaves the accumulator range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverflowPolicy {
    /// Modular (two's-complement) accumulation, identical on every backend.
    /// Callers are responsible for bounding operand length and magnitude.
    #[default]
    Wrapping,
    /// Accumulate in chunks and report [`Simd8Error::AccumulatorOverflow`]
    /// when the exact sum does not fit the accumulator type
    Checked,
}

/// Backend and overflow settings for vector and matrix operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComputeConfig {
    /// Execution backend (`Auto` resolves at call time)
    pub backend: Backend,
    /// Dot-product accumulator overflow policy
    pub overflow: OverflowPolicy,
}

impl ComputeConfig {
    /// Create a configuration with default values (auto backend, wrapping)
    pub fn new() -> Self {
        Self::default()
    }

    /// Scalar reference configuration
    pub fn scalar() -> Self {
        Self::new().with_backend(Backend::Scalar)
    }

    /// Auto-selected backend with overflow detection
    pub fn checked() -> Self {
        Self::new().with_overflow_policy(OverflowPolicy::Checked)
    }

    /// Set the execution backend
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Set the dot-product overflow policy
    pub fn with_overflow_policy(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Resolve `Auto` to a concrete backend and verify the CPU supports it
    ///
    /// # Errors
    ///
    /// Returns [`Simd8Error::UnsupportedBackend`] if the requested backend
    /// cannot run on this CPU.
    pub fn resolved(&self) -> Result<Self> {
        let backend = self.backend.resolve();
        if !backend.is_available() {
            return Err(Simd8Error::UnsupportedBackend(backend));
        }
        Ok(Self { backend, ..*self })
    }
}
