use sparsedot_core::Csr;
use sparsedot_kernels::{sp_matmul_topn_sorted, zip_sp_matmul_topn};

fn csr(nrows: usize, ncols: usize, rows: &[&[(i64, f64)]]) -> Csr<f64, i64> {
    let mut indptr = vec![0i64];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for row in rows {
        for &(c, v) in *row {
            indices.push(c);
            data.push(v);
        }
        indptr.push(indices.len() as i64);
    }
    Csr::from_parts(nrows, ncols, indptr, indices, data, true).unwrap()
}

fn mat_a() -> Csr<f64, i64> {
    csr(2, 3, &[&[(0, 1.0), (2, 2.0)], &[(1, 3.0)]])
}

fn mat_b() -> Csr<f64, i64> {
    csr(3, 2, &[&[(0, 4.0)], &[(0, 5.0), (1, 6.0)], &[(1, 7.0)]])
}

// column stripes of mat_b, widths [1, 1]
fn b_stripes() -> (Csr<f64, i64>, Csr<f64, i64>) {
    let b0 = csr(3, 1, &[&[(0, 4.0)], &[(0, 5.0)], &[]]);
    let b1 = csr(3, 1, &[&[], &[(0, 6.0)], &[(0, 7.0)]]);
    (b0, b1)
}

fn row(c: &Csr<f64, i64>, i: usize) -> Vec<(i64, f64)> {
    let start = c.indptr[i] as usize;
    let end = c.indptr[i + 1] as usize;
    (start..end).map(|k| (c.indices[k], c.data[k])).collect()
}

#[test]
fn zip_of_stripes_matches_unsplit_product() {
    let a = mat_a();
    let (b0, b1) = b_stripes();
    let c0 = sp_matmul_topn_sorted(&a, &b0, 1, Some(0.0), None);
    let c1 = sp_matmul_topn_sorted(&a, &b1, 1, Some(0.0), None);

    let z = zip_sp_matmul_topn(1, &[c0, c1]);
    let full = sp_matmul_topn_sorted(&a, &mat_b(), 1, Some(0.0), None);

    assert_eq!(z.shape(), full.shape());
    assert_eq!(z.indptr, full.indptr);
    assert_eq!(z.indices, full.indices);
    assert_eq!(z.data, full.data);
    assert_eq!(row(&z, 0), vec![(1, 14.0)]);
    assert_eq!(row(&z, 1), vec![(1, 18.0)]);
}

#[test]
fn zip_offsets_columns_by_stripe_widths() {
    // stripes with widths 2 and 3: stripe 1's local column 1 maps to 3
    let c0 = csr(1, 2, &[&[(0, 5.0)]]);
    let c1 = csr(1, 3, &[&[(1, 9.0), (2, 1.0)]]);
    let z = zip_sp_matmul_topn(2, &[c0, c1]);
    assert_eq!(z.ncols, 5);
    assert_eq!(row(&z, 0), vec![(3, 9.0), (0, 5.0)]);
}

#[test]
fn zip_rows_are_value_sorted() {
    let c0 = csr(2, 2, &[&[(0, 1.0), (1, 8.0)], &[(1, 2.0)]]);
    let c1 = csr(2, 2, &[&[(0, 4.0)], &[(0, 3.0), (1, 6.0)]]);
    let z = zip_sp_matmul_topn(3, &[c0, c1]);
    assert_eq!(row(&z, 0), vec![(1, 8.0), (2, 4.0), (0, 1.0)]);
    assert_eq!(row(&z, 1), vec![(3, 6.0), (2, 3.0), (1, 2.0)]);
}

#[test]
fn zip_caps_each_row_at_top_n() {
    let c0 = csr(1, 2, &[&[(0, 1.0), (1, 8.0)]]);
    let c1 = csr(1, 2, &[&[(0, 4.0), (1, 6.0)]]);
    let z = zip_sp_matmul_topn(2, &[c0, c1]);
    assert_eq!(row(&z, 0), vec![(1, 8.0), (3, 6.0)]);
}

#[test]
fn zip_single_stripe_is_identity_up_to_value_sort() {
    let a = mat_a();
    let c = sp_matmul_topn_sorted(&a, &mat_b(), 2, Some(0.0), None);
    let z = zip_sp_matmul_topn(2, &[c.clone()]);
    assert_eq!(z.indptr, c.indptr);
    assert_eq!(z.indices, c.indices);
    assert_eq!(z.data, c.data);
}

#[test]
fn zip_empty_rows_survive() {
    let c0 = csr(2, 1, &[&[], &[(0, 2.0)]]);
    let c1 = csr(2, 1, &[&[], &[]]);
    let z = zip_sp_matmul_topn(1, &[c0, c1]);
    assert_eq!(z.indptr, vec![0i64, 0, 1]);
    assert_eq!(row(&z, 1), vec![(0, 2.0)]);
}
