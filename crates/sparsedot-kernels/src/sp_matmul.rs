//! Unrestricted sparse-sparse product `C = A·B`.

use std::cell::RefCell;

use rayon::prelude::*;
use thread_local::ThreadLocal;
use tracing::debug;

use sparsedot_core::{Csr, Element, MatIndex};

use crate::build_pool;
use crate::error::KernelError;
use crate::size::{sp_matmul_size, sp_matmul_size_mt};
use crate::smmp::RowAccumulator;

/// C = A @ B for CSR inputs.
///
/// Entries whose accumulated sum cancels to exactly zero are dropped;
/// the output never stores explicit zeros. Column order within each row
/// is the accumulator's discovery order, not sorted.
#[must_use]
pub fn sp_matmul<T: Element, I: MatIndex>(a: &Csr<T, I>, b: &Csr<T, I>) -> Csr<T, I> {
    assert_eq!(a.ncols, b.nrows, "inner dimensions must agree");
    let nrows = a.nrows;
    let ncols = b.ncols;
    if nrows == 0 || ncols == 0 || a.nnz() == 0 || b.nnz() == 0 {
        return Csr::empty(nrows, ncols);
    }

    let (pattern_nnz, _) = sp_matmul_size(a, b);
    let mut data: Vec<T> = Vec::with_capacity(pattern_nnz);
    let mut indices: Vec<I> = Vec::with_capacity(pattern_nnz);
    let mut indptr = vec![I::zero(); nrows + 1];

    let mut acc: RowAccumulator<T, I> = RowAccumulator::new(ncols);
    for i in 0..nrows {
        acc.scan_row(a, b, i);
        acc.drain(|k, v| {
            if !v.is_zero() {
                indices.push(k);
                data.push(v);
            }
        });
        indptr[i + 1] = I::from_usize(data.len());
    }
    Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
}

/// Parallel [`sp_matmul`] on a scoped pool of `n_threads` workers
/// (`0` = rayon default).
///
/// A parallel sizing pass fixes each row's output region, workers fill
/// disjoint slices with private scratch, and a serial compact pass
/// squeezes out the gaps cancellation leaves behind.
///
/// # Errors
/// [`KernelError::ThreadPool`] if the scoped pool cannot be built.
pub fn sp_matmul_mt<T: Element, I: MatIndex>(
    a: &Csr<T, I>,
    b: &Csr<T, I>,
    n_threads: usize,
) -> Result<Csr<T, I>, KernelError> {
    assert_eq!(a.ncols, b.nrows, "inner dimensions must agree");
    let nrows = a.nrows;
    let ncols = b.ncols;
    if nrows == 0 || ncols == 0 || a.nnz() == 0 || b.nnz() == 0 {
        return Ok(Csr::empty(nrows, ncols));
    }

    let pool = build_pool(n_threads)?;
    debug!(nrows, nnz_a = a.nnz(), nnz_b = b.nnz(), n_threads, "sp_matmul_mt");
    Ok(pool.install(|| {
        let (pattern_nnz, pattern_indptr) = sp_matmul_size_mt(a, b);

        let mut data = vec![T::zero(); pattern_nnz];
        let mut indices = vec![I::zero(); pattern_nnz];
        let mut row_counts = vec![0usize; nrows];

        // Rows own disjoint [pattern_indptr[i], pattern_indptr[i+1])
        // slices, so raw-pointer writes from the row loop cannot alias.
        let data_addr = data.as_mut_ptr() as usize;
        let indices_addr = indices.as_mut_ptr() as usize;
        let tls: ThreadLocal<RefCell<RowAccumulator<T, I>>> = ThreadLocal::new();
        row_counts.par_iter_mut().enumerate().for_each(|(i, count)| {
            let cell = tls.get_or(|| RefCell::new(RowAccumulator::new(ncols)));
            let mut acc = cell.borrow_mut();
            let base = pattern_indptr[i].as_usize();
            let data_ptr = data_addr as *mut T;
            let indices_ptr = indices_addr as *mut I;
            let mut n = 0usize;
            acc.scan_row(a, b, i);
            acc.drain(|k, v| {
                if !v.is_zero() {
                    unsafe {
                        *indices_ptr.add(base + n) = k;
                        *data_ptr.add(base + n) = v;
                    }
                    n += 1;
                }
            });
            *count = n;
        });

        // compact: move each row's entries behind the previous row's
        let mut indptr = vec![I::zero(); nrows + 1];
        let mut write = 0usize;
        for i in 0..nrows {
            let base = pattern_indptr[i].as_usize();
            let n = row_counts[i];
            if write != base {
                data.copy_within(base..base + n, write);
                indices.copy_within(base..base + n, write);
            }
            write += n;
            indptr[i + 1] = I::from_usize(write);
        }
        data.truncate(write);
        indices.truncate(write);
        Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
    }))
}
