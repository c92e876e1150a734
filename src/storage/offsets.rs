//! Validated CSR offset arrays
//!
//! ```text
//! degrees: [2, 0, 3]
//! offsets: [0, 2, 2, 5]   // group i owns entries [offsets[i], offsets[i + 1])
//! ```

use crate::algorithms::{chunk_partition, expand_offsets, inclusive_scan_in_place, ChunkBoundaries};
use crate::error::OffsetError;
use crate::exec::{BufferAllocator, HostStream};
use crate::index::Index;
use anyhow::Result;
use rayon::prelude::*;

/// Check that `offsets` is a well-formed offset array
///
/// # Errors
///
/// Returns `OffsetError::Empty`, `OffsetError::NonZeroBase`, or
/// `OffsetError::NotMonotonic` with the first offending index
///
/// # Example
///
/// ```
/// use trueno_csr::{validate_offsets, OffsetError};
///
/// assert!(validate_offsets(&[0_u32, 2, 2, 5]).is_ok());
/// assert_eq!(
///     validate_offsets(&[0_u32, 3, 1]),
///     Err(OffsetError::NotMonotonic { index: 2 })
/// );
/// ```
pub fn validate_offsets<T: Index>(offsets: &[T]) -> Result<(), OffsetError> {
    let first = offsets.first().ok_or(OffsetError::Empty)?.to_usize();
    if first != 0 {
        return Err(OffsetError::NonZeroBase { first });
    }

    match offsets.windows(2).position(|w| w[1] < w[0]) {
        Some(pos) => Err(OffsetError::NotMonotonic { index: pos + 1 }),
        None => Ok(()),
    }
}

/// Owned offset array satisfying `validate_offsets`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetArray<T> {
    offsets: Vec<T>,
}

impl<T: Index> OffsetArray<T> {
    /// Wrap an existing offset vector
    ///
    /// # Errors
    ///
    /// Returns error if `offsets` fails validation
    pub fn from_vec(offsets: Vec<T>) -> Result<Self, OffsetError> {
        validate_offsets(&offsets)?;
        Ok(Self { offsets })
    }

    /// Offsets for zero groups (`[0]`)
    #[must_use]
    pub fn empty() -> Self {
        Self {
            offsets: vec![T::ZERO],
        }
    }

    /// Build offsets from a per-group count histogram
    ///
    /// # Errors
    ///
    /// Returns error if allocation fails or a negative count breaks monotonicity
    ///
    /// # Example
    ///
    /// ```
    /// use trueno_csr::{HostStream, OffsetArray, SystemAllocator};
    ///
    /// let offsets =
    ///     OffsetArray::from_degrees(&HostStream::global(), &SystemAllocator, &[2_u32, 0, 3]).unwrap();
    /// assert_eq!(offsets.as_slice(), &[0, 2, 2, 5]);
    /// ```
    pub fn from_degrees<A: BufferAllocator>(
        stream: &HostStream,
        alloc: &A,
        degrees: &[T],
    ) -> Result<Self> {
        let mut offsets = alloc.allocate_zeroed::<T>(degrees.len() + 1)?;
        offsets[1..].copy_from_slice(degrees);
        inclusive_scan_in_place(stream, &mut offsets[1..]);

        validate_offsets(&offsets)?;
        Ok(Self { offsets })
    }

    /// Build offsets from sorted group ids (e.g. the source column of a
    /// source-sorted edge list)
    ///
    /// `offsets[v]` is the number of ids below `v`, found by one lower-bound
    /// search per group. Negative ids (signed `M`) count as group 0.
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::UnsortedGroups` if `majors` is not sorted,
    /// `OffsetError::GroupOutOfRange` if an id is `>= num_groups`,
    /// `OffsetError::IndexOverflow` if the entry count does not fit in `T`,
    /// or an allocation error
    pub fn from_sorted_majors<M, A>(
        stream: &HostStream,
        alloc: &A,
        majors: &[M],
        num_groups: usize,
    ) -> Result<Self>
    where
        M: Index,
        A: BufferAllocator,
    {
        if let Some(pos) = majors.windows(2).position(|w| w[1] < w[0]) {
            return Err(OffsetError::UnsortedGroups { index: pos + 1 }.into());
        }
        if let Some(&max) = majors.last() {
            let id = max.to_usize();
            if id >= num_groups {
                return Err(OffsetError::GroupOutOfRange { id, num_groups }.into());
            }
        }
        T::try_from_usize(majors.len())?;

        let mut offsets = alloc.allocate_zeroed::<T>(num_groups + 1)?;
        let lower_bound = |(v, slot): (usize, &mut T)| -> Result<(), OffsetError> {
            *slot = T::try_from_usize(majors.partition_point(|m| m.to_usize() < v))?;
            Ok(())
        };

        if stream.is_parallel(offsets.len()) {
            stream.install(|| offsets.par_iter_mut().enumerate().try_for_each(lower_bound))?;
        } else {
            offsets.iter_mut().enumerate().try_for_each(lower_bound)?;
        }

        Ok(Self { offsets })
    }

    /// Number of groups (`len - 1`)
    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total entry count (last offset)
    #[must_use]
    pub fn total(&self) -> T {
        self.offsets.last().copied().unwrap_or(T::ZERO)
    }

    /// Entries owned by each group
    #[must_use]
    pub fn degrees(&self) -> Vec<T> {
        self.offsets
            .windows(2)
            .map(|w| w[1].wrapping_sub(w[0]))
            .collect()
    }

    /// Underlying offsets
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.offsets
    }

    /// Unwrap into the offset vector
    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.offsets
    }

    /// Per-entry group ids (see [`expand_offsets`](crate::expand_offsets))
    ///
    /// # Errors
    ///
    /// Returns error if allocation fails
    pub fn expand<V, A>(&self, stream: &HostStream, alloc: &A, base_idx: V) -> Result<Vec<V>>
    where
        V: Index,
        A: BufferAllocator,
    {
        expand_offsets(stream, alloc, &self.offsets, base_idx)
    }

    /// Chunk the entry range (see [`chunk_partition`](crate::chunk_partition))
    ///
    /// # Errors
    ///
    /// Returns error if `approx_chunk_size` is zero, the group count does not
    /// fit in `V`, or allocation fails
    pub fn chunk<V, A>(
        &self,
        stream: &HostStream,
        alloc: &A,
        approx_chunk_size: usize,
    ) -> Result<ChunkBoundaries<V, T>>
    where
        V: Index,
        A: BufferAllocator,
    {
        let num_groups = V::try_from_usize(self.num_groups())?;
        chunk_partition(
            stream,
            alloc,
            &self.offsets,
            num_groups,
            self.total(),
            approx_chunk_size,
        )
    }
}

impl<T: Index> Default for OffsetArray<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> AsRef<[T]> for OffsetArray<T> {
    fn as_ref(&self) -> &[T] {
        &self.offsets
    }
}
