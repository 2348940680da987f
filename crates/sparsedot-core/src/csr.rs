//! Definitions and constructors for CSR (Compressed Sparse Row) format matrices.
//!
//! CSR format is row-oriented: each row stores its nonzero column indices
//! and values in a contiguous block, with an indptr array marking row
//! boundaries. Column indices within a row are NOT required to be sorted:
//! the top-n kernels emit rows in admission order, and their inputs are
//! accepted unsorted as well.

use crate::error::CsrError;
use crate::num::{Element, MatIndex};

/// CSR (Compressed Sparse Row) format for 2D sparse matrices.
///
/// - `data`: values of nonzero elements (length = nnz)
/// - `indices`: column indices for nonzeros in row order (length = nnz)
/// - `indptr`: row pointers (length = nrows + 1)
///   - indptr[i] = start index in indices/data for row i
///   - indptr[nrows] = nnz
/// - `nrows`: number of rows in the matrix
/// - `ncols`: number of columns in the matrix
#[derive(Debug, Clone)]
pub struct Csr<T, I> {
    pub data: Vec<T>,    // Nonzero values in row-major order
    pub indices: Vec<I>, // Column indices (length = nnz)
    pub indptr: Vec<I>,  // Row pointers (length = nrows + 1)
    pub ncols: usize,    // Number of columns
    pub nrows: usize,    // Number of rows
}

impl<T, I> Csr<T, I> {
    /// Returns the number of stored elements (nnz).
    #[inline]
    #[must_use]
    pub const fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Returns the shape of the matrix as (nrows, ncols).
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }
}

impl<T: Element, I: MatIndex> Csr<T, I> {
    /// Constructs a `Csr<T, I>` from parts, with optional bounds and format
    /// checking.
    ///
    /// The cheap structural checks (array lengths, indptr endpoints) always
    /// run; `check` additionally walks every row validating that indptr is
    /// non-decreasing within `[0, nnz]` and that column indices are in
    /// bounds. Duplicate or unsorted column indices are accepted.
    ///
    /// # Errors
    /// Returns a [`CsrError`] naming the first violated invariant.
    pub fn from_parts(
        nrows: usize,
        ncols: usize,
        indptr: Vec<I>,
        indices: Vec<I>,
        data: Vec<T>,
        check: bool,
    ) -> Result<Self, CsrError> {
        let expected = nrows
            .checked_add(1)
            .ok_or(CsrError::IndptrLength { expected: usize::MAX, got: indptr.len() })?;
        if indptr.len() != expected {
            return Err(CsrError::IndptrLength { expected, got: indptr.len() });
        }
        if indices.len() != data.len() {
            return Err(CsrError::LengthMismatch { indices: indices.len(), data: data.len() });
        }
        let nnz = indices.len();
        if indptr.first().copied().and_then(|p| p.to_usize()) != Some(0) {
            return Err(CsrError::IndptrFirst);
        }
        if indptr.last().copied().and_then(|p| p.to_usize()) != Some(nnz) {
            return Err(CsrError::IndptrLast { nnz });
        }
        if check {
            for (row, pair) in indptr.windows(2).enumerate() {
                let (Some(start), Some(end)) = (pair[0].to_usize(), pair[1].to_usize()) else {
                    return Err(CsrError::IndptrNotMonotone { row });
                };
                if end < start || start > nnz || end > nnz {
                    return Err(CsrError::IndptrNotMonotone { row });
                }
                for &col in &indices[start..end] {
                    let in_bounds = col.to_usize().is_some_and(|c| c < ncols);
                    if !in_bounds {
                        return Err(CsrError::ColumnOutOfBounds {
                            row,
                            col: col.to_i64().unwrap_or(-1),
                            ncols,
                        });
                    }
                }
            }
        }
        Ok(Self { data, indices, indptr, ncols, nrows })
    }

    /// Constructs a `Csr<T, I>` from parts without any checks.
    ///
    /// Caller must ensure:
    /// - indptr.len() == nrows + 1
    /// - indices.len() == data.len() == nnz
    /// - indptr[0] == 0 and indptr[nrows] == nnz
    /// - indptr is non-decreasing
    /// - For each row: column indices are within [0, ncols)
    #[inline]
    #[must_use]
    pub const fn from_parts_unchecked(
        nrows: usize,
        ncols: usize,
        indptr: Vec<I>,
        indices: Vec<I>,
        data: Vec<T>,
    ) -> Self {
        Self { data, indices, indptr, ncols, nrows }
    }

    /// An all-zero matrix: every row is empty.
    #[must_use]
    pub fn empty(nrows: usize, ncols: usize) -> Self {
        Self {
            data: Vec::new(),
            indices: Vec::new(),
            indptr: vec![I::zero(); nrows + 1],
            ncols,
            nrows,
        }
    }
}
