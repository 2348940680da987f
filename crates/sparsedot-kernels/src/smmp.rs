//! Dense-scratch accumulators for one row of a sparse-sparse product.
//!
//! [`RowAccumulator`] implements the classical Gustavson scheme: while a
//! row of `A·B` is expanded, the touched output columns are threaded into
//! a singly-linked stack so they can be visited and cleared in
//! O(row-nnz); the full `ncols` range is never scanned, not even to
//! reset scratch between rows. [`RowMask`] is the pattern-only variant
//! used by the sizing passes: a row-id watermark that needs no clearing
//! at all.

use sparsedot_core::{Csr, Element, MatIndex};

/// Reusable scratch expanding `A[i,:] · B` into `(column, value)` pairs.
///
/// `sums` accumulates partial dot products per output column; `next`
/// threads every touched column into a linked stack (`-1` = untouched,
/// head sentinel `-2` = empty list). Both arrays are restored by
/// [`RowAccumulator::drain`], so one allocation serves every row of a
/// kernel call.
pub struct RowAccumulator<T, I> {
    sums: Vec<T>,
    next: Vec<I>,
    head: I,
    touched: usize,
    none: I,
}

impl<T: Element, I: MatIndex> RowAccumulator<T, I> {
    #[must_use]
    pub fn new(ncols: usize) -> Self {
        let none = -I::one();
        Self {
            sums: vec![T::zero(); ncols],
            next: vec![none; ncols],
            head: none - I::one(),
            touched: 0,
            none,
        }
    }

    /// Accumulate row `i` of `A·B` into the scratch arrays.
    ///
    /// Must be followed by exactly one [`RowAccumulator::drain`] before
    /// the next call; scanning twice merges two rows.
    pub fn scan_row(&mut self, a: &Csr<T, I>, b: &Csr<T, I>, i: usize) {
        let jj_start = a.indptr[i].as_usize();
        let jj_end = a.indptr[i + 1].as_usize();
        for jj in jj_start..jj_end {
            let j = a.indices[jj].as_usize();
            let v = a.data[jj];

            let kk_start = b.indptr[j].as_usize();
            let kk_end = b.indptr[j + 1].as_usize();
            for kk in kk_start..kk_end {
                let k = b.indices[kk].as_usize();
                self.sums[k] += v * b.data[kk];

                if self.next[k] == self.none {
                    // thread k onto the stack of touched columns
                    self.next[k] = self.head;
                    self.head = b.indices[kk];
                    self.touched += 1;
                }
            }
        }
    }

    /// Walk the touched columns, calling `emit(column, sum)` for each,
    /// and clear the scratch entry as it is visited. After the walk both
    /// arrays are fully reset.
    ///
    /// Emission order is the reverse of first-touch order (the linked
    /// list is a stack).
    pub fn drain(&mut self, mut emit: impl FnMut(I, T)) {
        let mut head = self.head;
        for _ in 0..self.touched {
            let col = head.as_usize();
            emit(head, self.sums[col]);
            head = self.next[col];
            self.next[col] = self.none;
            self.sums[col] = T::zero();
        }
        self.head = self.none - I::one();
        self.touched = 0;
    }
}

/// Row-id watermark over the output column space.
///
/// `mark(k, i)` is cheap because distinct rows carry distinct ids: stale
/// marks from earlier rows never collide, so the mask is allocated once
/// and never cleared.
pub struct RowMask<I> {
    mask: Vec<I>,
}

impl<I: MatIndex> RowMask<I> {
    #[must_use]
    pub fn new(ncols: usize) -> Self {
        Self { mask: vec![-I::one(); ncols] }
    }

    /// Number of distinct output columns in row `i` of the `A·B` pattern.
    pub fn row_nnz<T: Element>(&mut self, a: &Csr<T, I>, b: &Csr<T, I>, i: usize) -> usize {
        let row = I::from_usize(i);
        let mut n = 0usize;
        let jj_start = a.indptr[i].as_usize();
        let jj_end = a.indptr[i + 1].as_usize();
        for jj in jj_start..jj_end {
            let j = a.indices[jj].as_usize();
            let kk_start = b.indptr[j].as_usize();
            let kk_end = b.indptr[j + 1].as_usize();
            for kk in kk_start..kk_end {
                let k = b.indices[kk].as_usize();
                if self.mask[k] != row {
                    self.mask[k] = row;
                    n += 1;
                }
            }
        }
        n
    }
}
