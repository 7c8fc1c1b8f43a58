//! Owned 8-bit vector with a bound compute configuration

use crate::{ops, Backend, ComputeConfig, Element, OverflowPolicy, Result};

/// 8-bit integer vector that remembers how its operations execute
///
/// Operations between two vectors run with the configuration of the left
/// operand; the result carries that configuration forward.
///
/// # Examples
///
/// ```
/// use simd8::Vector;
///
/// let a = Vector::from_slice(&[1i8, 2, 3]);
/// let b = Vector::from_slice(&[4i8, 5, 6]);
///
/// assert_eq!(a.add(&b).unwrap().as_slice(), &[5, 7, 9]);
/// assert_eq!(a.dot(&b).unwrap(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vector<T: Element> {
    data: Vec<T>,
    config: ComputeConfig,
}

impl<T: Element> Vector<T> {
    /// Create vector from slice using the auto-selected backend
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Create vector with a specific backend (for benchmarking or testing)
    ///
    /// The backend is not checked here; an unavailable backend surfaces as
    /// [`crate::Simd8Error::UnsupportedBackend`] on the first operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use simd8::{Backend, Vector};
    ///
    /// let v = Vector::from_slice_with_backend(&[1u8, 2], Backend::Scalar);
    /// assert_eq!(v.backend(), Backend::Scalar);
    /// ```
    pub fn from_slice_with_backend(data: &[T], backend: Backend) -> Self {
        Self::from_slice_with_config(data, ComputeConfig::new().with_backend(backend))
    }

    /// Create vector with a full compute configuration
    pub fn from_slice_with_config(data: &[T], config: ComputeConfig) -> Self {
        Self {
            data: data.to_vec(),
            config,
        }
    }

    /// Take ownership of `data` using the auto-selected backend
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            data,
            config: ComputeConfig::default(),
        }
    }

    /// Replace the compute configuration
    pub fn with_config(mut self, config: ComputeConfig) -> Self {
        self.config = config;
        self
    }

    /// Get underlying data as slice
    ///
    /// # Examples
    ///
    /// ```
    /// use simd8::Vector;
    ///
    /// let v = Vector::from_slice(&[1u8, 2, 3]);
    /// assert_eq!(v.as_slice(), &[1, 2, 3]);
    /// ```
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the vector and return its data
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Get vector length
    ///
    /// # Examples
    ///
    /// ```
    /// use simd8::Vector;
    ///
    /// let v = Vector::from_slice(&[-1i8, 0, 1, 2, 3]);
    /// assert_eq!(v.len(), 5);
    /// ```
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if vector is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Backend requested for this vector (may be `Auto`)
    pub fn backend(&self) -> Backend {
        self.config.backend
    }

    /// Compute configuration used by this vector's operations
    pub fn config(&self) -> ComputeConfig {
        self.config
    }

    /// Element-wise wrapping addition
    ///
    /// # Errors
    ///
    /// Returns an error if the vectors differ in length, are empty, or the
    /// configured backend is unavailable.
    pub fn add(&self, other: &Self) -> Result<Self> {
        let data = ops::add_with(&self.config, &self.data, &other.data)?;
        Ok(Self {
            data,
            config: self.config,
        })
    }

    /// Element-wise wrapping subtraction
    ///
    /// # Errors
    ///
    /// Same as [`Vector::add`].
    ///
    /// # Examples
    ///
    /// ```
    /// use simd8::Vector;
    ///
    /// let a = Vector::from_slice(&[0u8, 10]);
    /// let b = Vector::from_slice(&[1u8, 3]);
    /// assert_eq!(a.sub(&b).unwrap().as_slice(), &[255, 7]);
    /// ```
    pub fn sub(&self, other: &Self) -> Result<Self> {
        let data = ops::sub_with(&self.config, &self.data, &other.data)?;
        Ok(Self {
            data,
            config: self.config,
        })
    }

    /// Dot product under this vector's overflow policy
    ///
    /// # Errors
    ///
    /// Same as [`Vector::add`], plus
    /// [`crate::Simd8Error::AccumulatorOverflow`] under
    /// [`OverflowPolicy::Checked`].
    pub fn dot(&self, other: &Self) -> Result<T::Acc> {
        ops::dot_with(&self.config, &self.data, &other.data)
    }

    /// Dot product with overflow detection regardless of the configured policy
    ///
    /// # Examples
    ///
    /// ```
    /// use simd8::{Simd8Error, Vector};
    ///
    /// let v = Vector::from_vec(vec![-128i8; 200_000]);
    /// assert!(matches!(v.dot_checked(&v), Err(Simd8Error::AccumulatorOverflow { .. })));
    /// ```
    pub fn dot_checked(&self, other: &Self) -> Result<T::Acc> {
        let config = self.config.with_overflow_policy(OverflowPolicy::Checked);
        ops::dot_with(&config, &self.data, &other.data)
    }
}

impl<T: Element> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

impl<T: Element> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
