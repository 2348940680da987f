//! Error types for sparsedot-core

use thiserror::Error;

/// Validation failures raised by [`crate::Csr::from_parts`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsrError {
    /// indptr has the wrong length for the row count
    #[error("indptr length must be nrows + 1 (expected {expected}, got {got})")]
    IndptrLength {
        /// nrows + 1
        expected: usize,
        /// actual indptr length
        got: usize,
    },

    /// indices and data disagree on nnz
    #[error("indices and data must have equal length ({indices} vs {data})")]
    LengthMismatch {
        /// indices length
        indices: usize,
        /// data length
        data: usize,
    },

    /// indptr does not start at zero
    #[error("indptr first element must be 0")]
    IndptrFirst,

    /// indptr does not end at nnz
    #[error("indptr last element must equal nnz ({nnz})")]
    IndptrLast {
        /// expected final value
        nnz: usize,
    },

    /// indptr decreases, is negative, or points past nnz
    #[error("indptr must be non-decreasing and within [0, nnz] (row {row})")]
    IndptrNotMonotone {
        /// first offending row
        row: usize,
    },

    /// a column index lies outside [0, ncols)
    #[error("column index {col} out of bounds for {ncols} columns (row {row})")]
    ColumnOutOfBounds {
        /// row holding the offending entry
        row: usize,
        /// the offending column index
        col: i64,
        /// number of columns
        ncols: usize,
    },
}
