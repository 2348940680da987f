//! Error types for sparsedot-kernels

use thiserror::Error;

/// Failures a `*_mt` kernel can surface to the caller.
///
/// Contract violations (mismatched shapes, `top_n == 0`) are programmer
/// errors and assert instead; see the crate docs.
#[derive(Error, Debug)]
pub enum KernelError {
    /// The scoped rayon pool could not be constructed
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
