//! Offset histogram expansion
//!
//! Turns a CSR offset array into one group id per entry: the inverse of
//! building offsets from a degree histogram.
//!
//! ```text
//! offsets: [0, 3, 3, 5]
//!
//! histogram of group starts: [0, 0, 0, 2, 0]   (offset 3 appears twice)
//! inclusive scan:            [0, 0, 0, 2, 2]
//! ```
//!
//! Two bulk passes regardless of group count, instead of one fill per group.

use crate::error::OffsetError;
use crate::exec::{BufferAllocator, HostStream};
use crate::index::Index;
use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::scan::inclusive_scan_in_place;

/// Expand an offset array into per-entry group ids
///
/// Entry `j` of the result is `base_idx + i` for the group `i` with
/// `offsets[i] <= j < offsets[i + 1]`. Empty groups contribute nothing.
///
/// # Errors
///
/// Returns `OffsetError::Empty` for an empty offset array,
/// `OffsetError::NonZeroBase` if `offsets[0] != 0`, or an allocation error.
///
/// # Example
///
/// ```
/// use trueno_csr::{expand_offsets, HostStream, SystemAllocator};
///
/// let ids = expand_offsets(&HostStream::global(), &SystemAllocator, &[0_u32, 3, 3, 5], 0_u32)
///     .unwrap();
/// assert_eq!(ids, vec![0, 0, 0, 2, 2]);
/// ```
pub fn expand_offsets<E, V, A>(
    stream: &HostStream,
    alloc: &A,
    offsets: &[E],
    base_idx: V,
) -> Result<Vec<V>>
where
    E: Index,
    V: Index,
    A: BufferAllocator,
{
    let first = offsets.first().ok_or(OffsetError::Empty)?.to_usize();
    if first != 0 {
        return Err(OffsetError::NonZeroBase { first }.into());
    }

    expand_offsets_lenient(stream, alloc, offsets, base_idx)
}

/// Expand an offset array without requiring `offsets[0] == 0`
///
/// The output length is `offsets[last]` and numbering starts at position 0,
/// so entries before `offsets[1]` are all attributed to group 0. For
/// `[5, 8, 12]` with base 100 this yields eight `100`s then four `101`s.
///
/// # Errors
///
/// Returns `OffsetError::Empty` for an empty offset array or an allocation error
pub fn expand_offsets_lenient<E, V, A>(
    stream: &HostStream,
    alloc: &A,
    offsets: &[E],
    base_idx: V,
) -> Result<Vec<V>>
where
    E: Index,
    V: Index,
    A: BufferAllocator,
{
    let len = offsets.last().ok_or(OffsetError::Empty)?.to_usize();
    debug!(
        stream = stream.id(),
        groups = offsets.len() - 1,
        len,
        "expand_offsets"
    );

    let mut out = alloc.allocate_zeroed::<V>(len)?;
    if len == 0 {
        return Ok(out);
    }

    out[0] = base_idx;
    scatter_group_starts(stream, &offsets[1..], &mut out);
    inclusive_scan_in_place(stream, &mut out);

    stream.synchronize();
    Ok(out)
}

/// Add one at every boundary position below `out.len()`
///
/// Each worker owns a disjoint block of `out` and binary-searches the sorted
/// boundaries for the ones that land in it.
fn scatter_group_starts<E: Index, V: Index>(stream: &HostStream, boundaries: &[E], out: &mut [V]) {
    let len = out.len();

    if !stream.is_parallel(len.max(boundaries.len())) {
        for &b in boundaries {
            let pos = b.to_usize();
            if pos < len {
                out[pos] = out[pos].wrapping_add(V::ONE);
            }
        }
        return;
    }

    debug_assert!(boundaries.windows(2).all(|w| w[0] <= w[1]));
    let block = stream.config().scan_block_size.max(1);
    trace!(stream = stream.id(), len, block, "blocked scatter");

    stream.install(|| {
        out.par_chunks_mut(block)
            .enumerate()
            .for_each(|(block_idx, chunk)| {
                let lo = block_idx * block;
                let hi = lo + chunk.len();
                let start = boundaries.partition_point(|b| b.to_usize() < lo);
                let end = boundaries.partition_point(|b| b.to_usize() < hi);

                for b in &boundaries[start..end] {
                    let slot = &mut chunk[b.to_usize() - lo];
                    *slot = slot.wrapping_add(V::ONE);
                }
            });
    });
}
