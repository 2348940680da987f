//! Sparse-sparse matrix product kernels for sparsedot (pure Rust, rayon-parallel)
//!
//! The kernels compute `C = A·B` for CSR inputs, optionally keeping only
//! the `top_n` largest entries per output row that exceed a threshold.
//! Parallel variants (`*_mt`) run inside a scoped rayon pool of the
//! requested width; rows are independent, so worker assignment never
//! changes output values, only the resolution of equal-value ties.
#![allow(
    clippy::many_single_char_names,
    reason = "Math kernels conventionally use i/j/k for indices"
)]

pub mod error;
pub mod maxheap;
pub mod size;
pub mod smmp;
pub mod sp_matmul;
pub mod sp_matmul_topn;
pub mod zip;

pub use error::KernelError;
pub use maxheap::{MaxHeap, Score};
pub use size::{
    sp_matmul_size, sp_matmul_size_mt, sp_matmul_topn_size, sp_matmul_topn_size_bound,
    sp_matmul_topn_size_mt,
};
pub use smmp::{RowAccumulator, RowMask};
pub use sp_matmul::{sp_matmul, sp_matmul_mt};
pub use sp_matmul_topn::{
    sp_matmul_topn, sp_matmul_topn_mt, sp_matmul_topn_sorted, sp_matmul_topn_sorted_mt,
};
pub use zip::zip_sp_matmul_topn;

/// Builds the scoped pool a `*_mt` kernel runs in. `n_threads == 0`
/// defers to rayon's default sizing (`RAYON_NUM_THREADS` or core count).
pub(crate) fn build_pool(n_threads: usize) -> Result<rayon::ThreadPool, KernelError> {
    Ok(rayon::ThreadPoolBuilder::new().num_threads(n_threads).build()?)
}
