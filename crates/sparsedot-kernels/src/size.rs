//! Sizing passes over the `A·B` sparsity pattern.
//!
//! These walk the pattern only (no values), so they use the watermark
//! mask rather than the linked-list accumulator. The exact passes bound
//! output allocation; `sp_matmul_topn_size_bound` is the cheaper
//! overestimate that skips the mask entirely.

use std::cell::RefCell;

use rayon::prelude::*;
use thread_local::ThreadLocal;

use sparsedot_core::{Csr, Element, MatIndex};

use crate::smmp::RowMask;

/// Exact nnz of `A·B` plus the output row pointers.
///
/// Cancellation is invisible to a pattern scan, so the counts are an
/// upper bound on the entries the value kernel actually stores.
#[must_use]
pub fn sp_matmul_size<T: Element, I: MatIndex>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
) -> (usize, Vec<I>) {
    let nrows = a.nrows;
    let mut indptr = vec![I::zero(); nrows + 1];
    let mut mask: RowMask<I> = RowMask::new(b.ncols);
    let mut nnz = 0usize;
    for i in 0..nrows {
        nnz += mask.row_nnz(a, b, i);
        indptr[i + 1] = I::from_usize(nnz);
    }
    (nnz, indptr)
}

/// Parallel [`sp_matmul_size`]: per-row counts are written in parallel
/// with thread-private masks, then prefix-summed serially after the join.
///
/// Runs on the current rayon pool; `*_mt` kernels call it inside their
/// scoped pool.
#[must_use]
pub fn sp_matmul_size_mt<T: Element, I: MatIndex>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
) -> (usize, Vec<I>) {
    let nrows = a.nrows;
    let mut indptr = vec![I::zero(); nrows + 1];
    let tls: ThreadLocal<RefCell<RowMask<I>>> = ThreadLocal::new();
    indptr[1..].par_iter_mut().enumerate().for_each(|(i, slot)| {
        let cell = tls.get_or(|| RefCell::new(RowMask::new(b.ncols)));
        let mut mask = cell.borrow_mut();
        *slot = I::from_usize(mask.row_nnz(a, b, i));
    });
    let mut nnz = I::zero();
    for i in 1..=nrows {
        nnz += indptr[i];
        indptr[i] = nnz;
    }
    (nnz.as_usize(), indptr)
}

/// Exact stored-entry bound for the top-n kernel: each row contributes
/// `min(top_n, row_nnz)`.
///
/// Row pointers are not produced here; in the top-n path the threshold
/// can shrink rows below `row_nnz`, so `C_indptr` is built by the main
/// kernel.
#[must_use]
pub fn sp_matmul_topn_size<T: Element, I: MatIndex>(
    top_n: usize,
    a: &Csr<T, I>,
    b: &Csr<T, I>,
) -> usize {
    let mut mask: RowMask<I> = RowMask::new(b.ncols);
    (0..a.nrows).map(|i| top_n.min(mask.row_nnz(a, b, i))).sum()
}

/// Parallel [`sp_matmul_topn_size`] (current rayon pool, thread-private
/// masks, reduction over rows).
#[must_use]
pub fn sp_matmul_topn_size_mt<T: Element, I: MatIndex>(
    top_n: usize,
    a: &Csr<T, I>,
    b: &Csr<T, I>,
) -> usize {
    let tls: ThreadLocal<RefCell<RowMask<I>>> = ThreadLocal::new();
    (0..a.nrows)
        .into_par_iter()
        .map(|i| {
            let cell = tls.get_or(|| RefCell::new(RowMask::new(b.ncols)));
            let mut mask = cell.borrow_mut();
            top_n.min(mask.row_nnz(a, b, i))
        })
        .sum()
}

/// Cheap maskless overestimate: counts every B entry reachable from a
/// row, duplicates included, before capping at `top_n`. Useful when the
/// O(ncols) mask is not worth allocating.
#[must_use]
pub fn sp_matmul_topn_size_bound<T: Element, I: MatIndex>(
    top_n: usize,
    a: &Csr<T, I>,
    b: &Csr<T, I>,
) -> usize {
    let mut nnz = 0usize;
    for i in 0..a.nrows {
        let mut row_nnz = 0usize;
        let jj_start = a.indptr[i].as_usize();
        let jj_end = a.indptr[i + 1].as_usize();
        for jj in jj_start..jj_end {
            let j = a.indices[jj].as_usize();
            row_nnz += b.indptr[j + 1].as_usize() - b.indptr[j].as_usize();
        }
        nnz += top_n.min(row_nnz);
    }
    nnz
}
