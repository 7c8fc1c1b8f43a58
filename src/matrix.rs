//! Matrix multiplication over 8-bit elements
//!
//! Every output cell is one dot product between a row of the left operand and
//! a column of the right operand. Columns are gathered once into a transposed
//! buffer so each dot product reads two contiguous slices.
//!
//! # Example
//!
//! ```
//! use simd8::Matrix;
//!
//! let a = Matrix::from_vec(2, 3, vec![1i8, 2, 3, 4, 5, 6]).unwrap();
//! let b = Matrix::from_vec(3, 2, vec![7i8, 8, 9, 10, 11, 12]).unwrap();
//!
//! let c = a.matmul(&b).unwrap();
//! assert_eq!(c.shape(), (2, 2));
//! assert_eq!(c.as_slice(), &[58, 64, 139, 154]);
//! ```

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{ops, Backend, ComputeConfig, Element, Result, Simd8Error};

/// A 2D matrix with row-major storage
///
/// For a 2x3 matrix:
/// ```text
/// [[a, b, c],
///  [d, e, f]]
/// ```
/// Data is stored as: [a, b, c, d, e, f]
///
/// The element type is any `Copy` value so that products of `i8`/`u8`
/// matrices can hold their 32-bit accumulator cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
    backend: Backend,
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        Simd8Error::DimensionMismatch(format!("{rows}x{cols} matrix exceeds addressable size"))
    })
}

impl<T: Copy + Default> Matrix<T> {
    /// Creates a `rows x cols` matrix filled with `T::default()`
    ///
    /// # Example
    ///
    /// ```
    /// use simd8::Matrix;
    ///
    /// let m: Matrix<u8> = Matrix::new(3, 4);
    /// assert_eq!(m.shape(), (3, 4));
    /// assert!(m.as_slice().iter().all(|&x| x == 0));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`. Use [`Matrix::from_vec`]
    /// for a fallible constructor.
    pub fn new(rows: usize, cols: usize) -> Self {
        let len = rows
            .checked_mul(cols)
            .unwrap_or_else(|| panic!("{rows}x{cols} matrix exceeds addressable size"));
        Matrix {
            rows,
            cols,
            data: vec![T::default(); len],
            backend: Backend::Auto,
        }
    }

    /// Alias of [`Matrix::new`]
    ///
    /// # Panics
    ///
    /// Same as [`Matrix::new`].
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols)
    }

    /// Creates a matrix from row-major data
    ///
    /// # Errors
    ///
    /// Returns [`Simd8Error::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let expected = checked_len(rows, cols)?;
        if data.len() != expected {
            return Err(Simd8Error::DimensionMismatch(format!(
                "data length {} does not match matrix dimensions {}x{} (expected {})",
                data.len(),
                rows,
                cols,
                expected
            )));
        }

        Ok(Matrix {
            rows,
            cols,
            data,
            backend: Backend::Auto,
        })
    }

    /// Creates a matrix by copying row-major data
    ///
    /// # Errors
    ///
    /// Same as [`Matrix::from_vec`].
    pub fn from_slice(rows: usize, cols: usize, data: &[T]) -> Result<Self> {
        Self::from_vec(rows, cols, data.to_vec())
    }

    /// Creates a matrix from a list of rows
    ///
    /// An empty list yields a 0x0 matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Simd8Error::DimensionMismatch`] if the rows differ in length.
    ///
    /// # Example
    ///
    /// ```
    /// use simd8::{Matrix, Simd8Error};
    ///
    /// let m = Matrix::from_rows(&[vec![1u8, 2], vec![3, 4]]).unwrap();
    /// assert_eq!(m.get(1, 0), Some(&3));
    ///
    /// let ragged = Matrix::from_rows(&[vec![1u8, 2], vec![3]]);
    /// assert!(matches!(ragged, Err(Simd8Error::DimensionMismatch(_))));
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Simd8Error::DimensionMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }

        Self::from_vec(rows.len(), cols, data)
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element at `(row, col)`, or `None` if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col)
    }

    /// Mutable element at `(row, col)`, or `None` if out of bounds
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get_mut(row * self.cols + col)
    }

    /// Contiguous view of row `row`
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        Some(&self.data[start..start + self.cols])
    }

    /// Copy of column `col`
    pub fn column(&self, col: usize) -> Option<Vec<T>> {
        if col >= self.cols {
            return None;
        }
        Some(
            (0..self.rows)
                .map(|row| self.data[row * self.cols + col])
                .collect(),
        )
    }

    /// Row-major backing storage
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Copy into one `Vec` per row
    ///
    /// # Example
    ///
    /// ```
    /// use simd8::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 2, vec![1i8, 2, 3, 4]).unwrap();
    /// assert_eq!(m.to_rows(), vec![vec![1, 2], vec![3, 4]]);
    /// ```
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.data.chunks(self.cols).map(<[T]>::to_vec).collect()
    }

    /// Transpose into a new `cols x rows` matrix
    ///
    /// # Example
    ///
    /// ```
    /// use simd8::Matrix;
    ///
    /// let m = Matrix::from_vec(2, 3, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    /// let t = m.transpose();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn transpose(&self) -> Matrix<T> {
        let mut data = Vec::with_capacity(self.data.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                data.push(self.data[row * self.cols + col]);
            }
        }

        Matrix {
            rows: self.cols,
            cols: self.rows,
            data,
            backend: self.backend,
        }
    }

    /// Backend used by [`Matrix::matmul`] (may be `Auto`)
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Set the backend used by [`Matrix::matmul`]
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

impl<T: Element> Matrix<T> {
    /// Matrix multiplication with this matrix's backend and wrapping
    /// accumulation
    ///
    /// # Errors
    ///
    /// See [`Matrix::matmul_with`].
    pub fn matmul(&self, other: &Matrix<T>) -> Result<Matrix<T::Acc>> {
        self.matmul_with(other, &ComputeConfig::new().with_backend(self.backend))
    }

    /// Matrix multiplication with an explicit configuration
    ///
    /// `self` is `m x k`, `other` is `k x n`, the result is `m x n` with
    /// accumulator cells. Each cell is computed by [`ops::dot_with`], so the
    /// kernel tier follows `k` and the overflow policy applies per cell.
    ///
    /// # Errors
    ///
    /// - [`Simd8Error::DimensionMismatch`] if `self.cols() != other.rows()` or
    ///   any of `m`, `k`, `n` is zero
    /// - [`Simd8Error::UnsupportedBackend`] if the backend cannot run
    /// - [`Simd8Error::AccumulatorOverflow`] if a cell overflows under
    ///   [`crate::OverflowPolicy::Checked`]
    ///
    /// # Example
    ///
    /// ```
    /// use simd8::{ComputeConfig, Matrix};
    ///
    /// let a = Matrix::from_rows(&[[255u8; 4]]).unwrap();
    /// let b = Matrix::from_rows(&[[255u8], [255], [255], [255]]).unwrap();
    ///
    /// let c = a.matmul_with(&b, &ComputeConfig::scalar()).unwrap();
    /// assert_eq!(c.get(0, 0), Some(&260_100));
    /// ```
    #[cfg_attr(feature = "tracing", instrument(skip(self, other, config), fields(dims = %format!("{}x{} @ {}x{}", self.rows, self.cols, other.rows, other.cols))))]
    pub fn matmul_with(&self, other: &Matrix<T>, config: &ComputeConfig) -> Result<Matrix<T::Acc>> {
        if self.cols != other.rows {
            return Err(Simd8Error::DimensionMismatch(format!(
                "matrix multiplication requires A.cols == B.rows, got {}x{} @ {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        if self.rows == 0 || self.cols == 0 || other.cols == 0 {
            return Err(Simd8Error::DimensionMismatch(format!(
                "matrix multiplication requires non-zero dimensions, got {}x{} @ {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }

        let config = config.resolved()?;
        let (m, k, n) = (self.rows, self.cols, other.cols);

        // Columns of B as contiguous rows of length k
        let b_t = other.transpose();
        let mut data = Vec::with_capacity(m * n);

        for a_row in self.data.chunks_exact(k) {
            for b_col in b_t.data.chunks_exact(k) {
                data.push(ops::dot_with(&config, a_row, b_col)?);
            }
        }

        Ok(Matrix {
            rows: m,
            cols: n,
            data,
            backend: self.backend,
        })
    }
}
