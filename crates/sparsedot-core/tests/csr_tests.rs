use sparsedot_core::{Csr, CsrError};

#[test]
fn from_parts_ok() {
    let nrows = 2usize;
    let ncols = 3usize;
    let indptr = vec![0i64, 2, 3];
    let indices = vec![0i64, 2, 1];
    let data = vec![1.0f64, 2.0, 3.0];
    let csr = Csr::from_parts(nrows, ncols, indptr, indices, data, true).unwrap();
    assert_eq!(csr.nnz(), 3);
    assert_eq!(csr.shape(), (2, 3));
}

#[test]
fn from_parts_i32_indices() {
    let indptr = vec![0i32, 1, 1];
    let indices = vec![2i32];
    let data = vec![5i32];
    let csr = Csr::from_parts(2, 3, indptr, indices, data, true).unwrap();
    assert_eq!(csr.nnz(), 1);
}

#[test]
fn unsorted_columns_accepted() {
    // Row stores columns out of order, as the top-n kernels emit them.
    let indptr = vec![0i64, 3];
    let indices = vec![2i64, 0, 1];
    let data = vec![1.0f64, 2.0, 3.0];
    let csr = Csr::from_parts(1, 3, indptr, indices, data, true).unwrap();
    assert_eq!(csr.nnz(), 3);
}

#[test]
fn indptr_first_must_be_zero() {
    let indptr = vec![1i64, 1];
    let indices = vec![0i64];
    let data = vec![1.0f64];
    let err = Csr::from_parts(1, 3, indptr, indices, data, true).unwrap_err();
    assert_eq!(err, CsrError::IndptrFirst);
}

#[test]
fn nnz_and_lengths_must_match() {
    let indptr = vec![0i64, 2];
    let indices = vec![0i64, 1];
    let data = vec![1.0f64];
    let err = Csr::from_parts(1, 3, indptr, indices, data, true).unwrap_err();
    assert_eq!(err, CsrError::LengthMismatch { indices: 2, data: 1 });
}

#[test]
fn last_element_must_equal_nnz() {
    let indptr = vec![0i64, 1];
    let indices = vec![0i64, 1];
    let data = vec![1.0f64, 2.0];
    let err = Csr::from_parts(1, 3, indptr, indices, data, true).unwrap_err();
    assert_eq!(err, CsrError::IndptrLast { nnz: 2 });
}

#[test]
fn indptr_length_must_be_nrows_plus_one() {
    let indptr = vec![0i64, 1];
    let indices = vec![0i64];
    let data = vec![1.0f64];
    let err = Csr::from_parts(2, 3, indptr, indices, data, true).unwrap_err();
    assert_eq!(err, CsrError::IndptrLength { expected: 3, got: 2 });
}

#[test]
fn indptr_non_decreasing_per_row() {
    let indptr = vec![0i64, 2, 1];
    let indices = vec![0i64];
    let data = vec![1.0f64];
    // structural endpoint checks pass (first 0, last 1 == nnz), the walk fails
    let err = Csr::from_parts(2, 3, indptr, indices, data, true).unwrap_err();
    assert_eq!(err, CsrError::IndptrNotMonotone { row: 1 });
}

#[test]
fn column_index_out_of_bounds() {
    let indptr = vec![0i64, 1];
    let indices = vec![3i64]; // valid: 0..=2
    let data = vec![1.0f64];
    let err = Csr::from_parts(1, 3, indptr, indices, data, true).unwrap_err();
    assert_eq!(err, CsrError::ColumnOutOfBounds { row: 0, col: 3, ncols: 3 });
}

#[test]
fn negative_column_index_rejected() {
    let indptr = vec![0i64, 1];
    let indices = vec![-1i64];
    let data = vec![1.0f64];
    let err = Csr::from_parts(1, 3, indptr, indices, data, true).unwrap_err();
    assert_eq!(err, CsrError::ColumnOutOfBounds { row: 0, col: -1, ncols: 3 });
}

#[test]
fn empty_matrix_shapes() {
    let z: Csr<f64, i64> = Csr::empty(0, 0);
    assert_eq!(z.indptr, vec![0i64]);
    assert_eq!(z.nnz(), 0);

    let z: Csr<f64, i64> = Csr::empty(4, 7);
    assert_eq!(z.indptr, vec![0i64; 5]);
    assert_eq!(z.shape(), (4, 7));
}
