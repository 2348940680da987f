//! Top-n sparse-sparse product `C = top_n(A·B > threshold)`.

use std::cell::RefCell;

use rayon::prelude::*;
use thread_local::ThreadLocal;
use tracing::debug;

use sparsedot_core::{Csr, Element, MatIndex};

use crate::build_pool;
use crate::error::KernelError;
use crate::maxheap::MaxHeap;
use crate::size::sp_matmul_topn_size;
use crate::smmp::RowAccumulator;

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn density_reserve(density: f64, top_n: usize, nrows: usize) -> usize {
    debug_assert!(density >= 0.0);
    (density * top_n as f64 * nrows as f64).ceil() as usize
}

fn sp_matmul_topn_inner<T: Element, I: MatIndex, const INSERTION_SORT: bool>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
    top_n: usize,
    threshold: Option<T>,
    density: Option<f64>,
) -> Csr<T, I> {
    assert_eq!(a.ncols, b.nrows, "inner dimensions must agree");
    assert!(top_n >= 1, "top_n must be at least 1");
    let nrows = a.nrows;
    let ncols = b.ncols;
    if nrows == 0 || ncols == 0 || a.nnz() == 0 || b.nnz() == 0 {
        return Csr::empty(nrows, ncols);
    }

    // With a caller threshold the result density is unknown up front:
    // reserve from the density hint if given, else grow. Without one,
    // the sizing pass yields an exact bound and the threshold drops to
    // the most negative value, admitting every product.
    let (reserve, local_threshold) = match threshold {
        Some(t) => (density.map_or(0, |d| density_reserve(d, top_n, nrows)), t),
        None => (sp_matmul_topn_size(top_n, a, b), T::min_value()),
    };

    let mut data: Vec<T> = Vec::with_capacity(reserve);
    let mut indices: Vec<I> = Vec::with_capacity(reserve);
    let mut indptr = vec![I::zero(); nrows + 1];

    let mut acc: RowAccumulator<T, I> = RowAccumulator::new(ncols);
    let mut heap: MaxHeap<T, I> = MaxHeap::new(top_n, local_threshold);
    for i in 0..nrows {
        let mut min = heap.reset();
        acc.scan_row(a, b, i);
        // admission and scratch clearing share the single drain pass
        acc.drain(|k, v| {
            if v > min {
                min = heap.push_pop(k, v);
            }
        });
        if INSERTION_SORT {
            heap.insertion_sort();
        } else {
            heap.value_sort();
        }
        let n_set = heap.n_set();
        for score in &heap.entries()[..n_set] {
            indices.push(score.idx);
            data.push(score.val);
        }
        indptr[i + 1] = I::from_usize(data.len());
    }
    Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
}

/// C = A @ B keeping per row the `top_n` largest values strictly greater
/// than `threshold`; row entries appear in the order they were first
/// admitted to the heap.
///
/// `threshold == None` admits every product and lets the kernel pre-size
/// the output exactly. `density` is an optional hint (expected fraction
/// of `nrows * top_n` slots filled) used to reserve the output when a
/// threshold makes exact sizing impossible.
#[must_use]
pub fn sp_matmul_topn<T: Element, I: MatIndex>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
    top_n: usize,
    threshold: Option<T>,
    density: Option<f64>,
) -> Csr<T, I> {
    sp_matmul_topn_inner::<T, I, true>(a, b, top_n, threshold, density)
}

/// [`sp_matmul_topn`] with row entries sorted descending by value.
#[must_use]
pub fn sp_matmul_topn_sorted<T: Element, I: MatIndex>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
    top_n: usize,
    threshold: Option<T>,
    density: Option<f64>,
) -> Csr<T, I> {
    sp_matmul_topn_inner::<T, I, false>(a, b, top_n, threshold, density)
}

fn sp_matmul_topn_mt_inner<T: Element, I: MatIndex, const INSERTION_SORT: bool>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
    top_n: usize,
    threshold: Option<T>,
    n_threads: usize,
) -> Result<Csr<T, I>, KernelError> {
    assert_eq!(a.ncols, b.nrows, "inner dimensions must agree");
    assert!(top_n >= 1, "top_n must be at least 1");
    let nrows = a.nrows;
    let ncols = b.ncols;
    if nrows == 0 || ncols == 0 || a.nnz() == 0 || b.nnz() == 0 {
        return Ok(Csr::empty(nrows, ncols));
    }
    let local_threshold = threshold.unwrap_or_else(T::min_value);

    let pool = build_pool(n_threads)?;
    debug!(nrows, top_n, n_threads, "sp_matmul_topn_mt");
    Ok(pool.install(|| {
        // Every row owns a fixed top_n-wide slot in the staging area and
        // one row_nset counter, so workers never share a write target.
        let mut staged_vals = vec![T::zero(); nrows * top_n];
        let mut staged_idxs = vec![I::zero(); nrows * top_n];
        let mut row_nset = vec![0usize; nrows];

        let tls: ThreadLocal<RefCell<(RowAccumulator<T, I>, MaxHeap<T, I>)>> =
            ThreadLocal::new();
        staged_vals
            .par_chunks_mut(top_n)
            .zip(staged_idxs.par_chunks_mut(top_n))
            .zip(row_nset.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((vals, idxs), nset))| {
                let cell = tls.get_or(|| {
                    RefCell::new((
                        RowAccumulator::new(ncols),
                        MaxHeap::new(top_n, local_threshold),
                    ))
                });
                let (acc, heap) = &mut *cell.borrow_mut();
                let mut min = heap.reset();
                acc.scan_row(a, b, i);
                acc.drain(|k, v| {
                    if v > min {
                        min = heap.push_pop(k, v);
                    }
                });
                if INSERTION_SORT {
                    heap.insertion_sort();
                } else {
                    heap.value_sort();
                }
                let n = heap.n_set();
                for (t, score) in heap.entries()[..n].iter().enumerate() {
                    idxs[t] = score.idx;
                    vals[t] = score.val;
                }
                *nset = n;
            });

        // serial compact: concatenate each row's first row_nset entries
        let total: usize = row_nset.iter().sum();
        let mut data: Vec<T> = Vec::with_capacity(total);
        let mut indices: Vec<I> = Vec::with_capacity(total);
        let mut indptr = vec![I::zero(); nrows + 1];
        for (i, &n) in row_nset.iter().enumerate() {
            let base = i * top_n;
            data.extend_from_slice(&staged_vals[base..base + n]);
            indices.extend_from_slice(&staged_idxs[base..base + n]);
            indptr[i + 1] = I::from_usize(data.len());
        }
        Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
    }))
}

/// Parallel [`sp_matmul_topn`] on a scoped pool of `n_threads` workers
/// (`0` = rayon default). Workers fill a `nrows × top_n` staging area;
/// a serial compact pass builds the final CSR.
///
/// # Errors
/// [`KernelError::ThreadPool`] if the scoped pool cannot be built.
pub fn sp_matmul_topn_mt<T: Element, I: MatIndex>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
    top_n: usize,
    threshold: Option<T>,
    n_threads: usize,
) -> Result<Csr<T, I>, KernelError> {
    sp_matmul_topn_mt_inner::<T, I, true>(a, b, top_n, threshold, n_threads)
}

/// [`sp_matmul_topn_mt`] with row entries sorted descending by value.
///
/// # Errors
/// [`KernelError::ThreadPool`] if the scoped pool cannot be built.
pub fn sp_matmul_topn_sorted_mt<T: Element, I: MatIndex>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
    top_n: usize,
    threshold: Option<T>,
    n_threads: usize,
) -> Result<Csr<T, I>, KernelError> {
    sp_matmul_topn_mt_inner::<T, I, false>(a, b, top_n, threshold, n_threads)
}
