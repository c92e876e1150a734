//! Integer types usable as offsets, vertex ids and group ids

use crate::error::OffsetError;
use std::fmt::Debug;

/// Integer type that can live in an offset array or an expanded index array
///
/// Implemented for `u32`, `u64`, `usize`, `i32` and `i64`. Arithmetic used by the
/// scan is wrapping, matching device integer semantics.
pub trait Index: Copy + Ord + Default + Debug + Send + Sync + 'static {
    /// Additive identity
    const ZERO: Self;

    /// One
    const ONE: Self;

    /// Convert from `usize`, failing if the value does not fit
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::IndexOverflow` if `value` is out of range for `Self`
    fn try_from_usize(value: usize) -> Result<Self, OffsetError>;

    /// Convert to `usize`
    ///
    /// Negative values map to 0; offsets are never negative in a valid array.
    fn to_usize(self) -> usize;

    /// Wrapping addition
    #[must_use]
    fn wrapping_add(self, rhs: Self) -> Self;

    /// Wrapping subtraction
    #[must_use]
    fn wrapping_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_index {
    ($($t:ty),*) => {
        $(
            impl Index for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn try_from_usize(value: usize) -> Result<Self, OffsetError> {
                    <$t>::try_from(value).map_err(|_| OffsetError::IndexOverflow { value })
                }

                #[inline]
                fn to_usize(self) -> usize {
                    usize::try_from(self).unwrap_or(0)
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$t>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$t>::wrapping_sub(self, rhs)
                }
            }
        )*
    };
}

impl_index!(u32, u64, usize, i32, i64);
