//! Error types for simd8 operations

use thiserror::Error;

use crate::Backend;

/// Result type for simd8 operations
pub type Result<T> = std::result::Result<T, Simd8Error>;

/// Errors that can occur during simd8 operations
///
/// Every variant is detectable from operand shapes or configuration alone;
/// no error depends on element values except [`Simd8Error::AccumulatorOverflow`],
/// which is only produced under [`crate::OverflowPolicy::Checked`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Simd8Error {
    /// Backend not supported on this platform
    #[error("Backend not supported on this platform: {0:?}")]
    UnsupportedBackend(Backend),

    /// Operand lengths disagree
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Length of the left operand
        expected: usize,
        /// Length of the right operand
        actual: usize,
    },

    /// Zero-length operand where a non-empty one is required
    #[error("Empty input: operands must have length greater than 0")]
    EmptyInput,

    /// Non-conformable or degenerate matrix shapes
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Exact dot-product sum does not fit the accumulator type
    #[error("Accumulator overflow in dot product of length {len}")]
    AccumulatorOverflow {
        /// Operand length of the overflowing dot product
        len: usize,
    },
}
