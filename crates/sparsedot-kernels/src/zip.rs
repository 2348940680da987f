//! Merge of column-stripe top-n products into one global result.

use sparsedot_core::{Csr, Element, MatIndex};

use crate::maxheap::MaxHeap;

/// Z = zip_j C_j, where C_j = top_n(A·B_j) over a column-wise split of B.
///
/// Stripe `j`'s column indices are shifted by the widths of the stripes
/// before it, so `Z` covers the concatenated column space. Each row of
/// `Z` holds the `top_n` largest values across its stripes, sorted
/// descending by value. Thresholds are not re-applied: every stripe was
/// already filtered, and the merge preserves that property.
#[must_use]
pub fn zip_sp_matmul_topn<T: Element, I: MatIndex>(
    top_n: usize,
    stripes: &[Csr<T, I>],
) -> Csr<T, I> {
    assert!(!stripes.is_empty(), "at least one stripe is required");
    assert!(top_n >= 1, "top_n must be at least 1");
    let nrows = stripes[0].nrows;
    for c in stripes {
        assert_eq!(c.nrows, nrows, "stripes must share a row count");
    }

    // global column offset of each stripe
    let mut offsets: Vec<I> = Vec::with_capacity(stripes.len());
    let mut ncols = 0usize;
    for c in stripes {
        offsets.push(I::from_usize(ncols));
        ncols += c.ncols;
    }

    let max_nnz = (nrows * top_n).min(stripes.iter().map(Csr::nnz).sum());
    let mut data: Vec<T> = Vec::with_capacity(max_nnz);
    let mut indices: Vec<I> = Vec::with_capacity(max_nnz);
    let mut indptr = vec![I::zero(); nrows + 1];

    // admit everything: the stripes were already thresholded
    let mut heap: MaxHeap<T, I> = MaxHeap::new(top_n, T::min_value());
    for i in 0..nrows {
        let mut min = heap.reset();
        // reverse stripe order mirrors the reversed linked-list walk of
        // the row kernel, keeping cross-stripe ties stable
        for (j, c) in stripes.iter().enumerate().rev() {
            let start = c.indptr[i].as_usize();
            let end = c.indptr[i + 1].as_usize();
            for k in start..end {
                let val = c.data[k];
                if val > min {
                    min = heap.push_pop(offsets[j] + c.indices[k], val);
                }
            }
        }
        heap.value_sort();
        let n_set = heap.n_set();
        for score in &heap.entries()[..n_set] {
            indices.push(score.idx);
            data.push(score.val);
        }
        indptr[i + 1] = I::from_usize(data.len());
    }
    Csr::from_parts_unchecked(nrows, ncols, indptr, indices, data)
}
