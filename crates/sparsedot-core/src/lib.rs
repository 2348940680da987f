//! Core data structures and type seams for sparsedot (pure Rust)

pub mod csr;
pub mod error;
pub mod num;

pub use csr::Csr;
pub use error::CsrError;
pub use num::{Element, MatIndex};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
