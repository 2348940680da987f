//! Numeric and index type seams.
//!
//! Every kernel is generic over an element type `T: Element` and an index
//! type `I: MatIndex`; the supported monomorphizations are exactly the
//! cross product of the impls below.

use std::ops::{AddAssign, Mul};

use num_traits::{Bounded, PrimInt, Signed, Zero};

/// Element type of the matrices.
///
/// `Bounded::min_value()` doubles as the "admit everything" threshold:
/// it is the most negative representable value, so every finite product
/// compares strictly greater.
pub trait Element:
    Copy + PartialOrd + Zero + Bounded + AddAssign + Mul<Output = Self> + Send + Sync + 'static
{
}

impl Element for f32 {}
impl Element for f64 {}
impl Element for i32 {}
impl Element for i64 {}

/// Integer type of the indptr/indices arrays.
///
/// Must be signed and at least 32 bits wide so the accumulator sentinels
/// (-1 and -2) are representable alongside any valid column index.
pub trait MatIndex: PrimInt + Signed + AddAssign + Send + Sync + 'static {
    fn as_usize(self) -> usize;
    fn from_usize(x: usize) -> Self;
}

impl MatIndex for i32 {
    #[inline]
    fn as_usize(self) -> usize {
        debug_assert!(self >= 0);
        #[allow(clippy::cast_sign_loss)]
        {
            self as usize
        }
    }

    #[inline]
    fn from_usize(x: usize) -> Self {
        debug_assert!(i32::try_from(x).is_ok());
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        {
            x as i32
        }
    }
}

impl MatIndex for i64 {
    #[inline]
    fn as_usize(self) -> usize {
        debug_assert!(self >= 0);
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        {
            self as usize
        }
    }

    #[inline]
    fn from_usize(x: usize) -> Self {
        debug_assert!(i64::try_from(x).is_ok());
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        {
            x as i64
        }
    }
}
