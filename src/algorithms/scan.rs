//! Blocked parallel prefix scan
//!
//! Three passes: scan each block locally, exclusive-scan the block totals,
//! then add each block's carry. Based on Blelloch (1990) "Prefix Sums and
//! Their Applications".

use crate::exec::{BufferAllocator, HostStream};
use crate::index::Index;
use anyhow::Result;
use rayon::prelude::*;
use tracing::trace;

/// In-place inclusive prefix scan with wrapping addition
///
/// # Example
///
/// ```
/// use trueno_csr::{inclusive_scan_in_place, HostStream};
///
/// let mut data = vec![1_u32, 0, 2, 0, 3];
/// inclusive_scan_in_place(&HostStream::global(), &mut data);
/// assert_eq!(data, vec![1, 1, 3, 3, 6]);
/// ```
pub fn inclusive_scan_in_place<T: Index>(stream: &HostStream, data: &mut [T]) {
    let block = stream.config().scan_block_size.max(1);

    if !stream.is_parallel(data.len()) || data.len() <= block {
        scan_block(data);
        return;
    }

    trace!(stream = stream.id(), len = data.len(), block, "blocked scan");

    stream.install(|| {
        let totals: Vec<T> = data
            .par_chunks_mut(block)
            .map(|chunk| {
                scan_block(chunk);
                chunk.last().copied().unwrap_or(T::ZERO)
            })
            .collect();

        let mut carries = Vec::with_capacity(totals.len());
        let mut acc = T::ZERO;
        for total in totals {
            carries.push(acc);
            acc = acc.wrapping_add(total);
        }

        data.par_chunks_mut(block)
            .zip(carries.par_iter())
            .skip(1)
            .for_each(|(chunk, &carry)| {
                for value in chunk {
                    *value = value.wrapping_add(carry);
                }
            });
    });
}

/// Exclusive prefix scan into a freshly allocated buffer
///
/// Returns the scanned buffer (same length as `input`) and the grand total.
///
/// # Errors
///
/// Returns error if the allocator refuses the output buffer
pub fn exclusive_scan<T, A>(stream: &HostStream, alloc: &A, input: &[T]) -> Result<(Vec<T>, T)>
where
    T: Index,
    A: BufferAllocator,
{
    let mut out = alloc.allocate_zeroed::<T>(input.len())?;

    let Some((&last, head)) = input.split_last() else {
        return Ok((out, T::ZERO));
    };

    out[1..].copy_from_slice(head);
    inclusive_scan_in_place(stream, &mut out);

    let total = out.last().copied().unwrap_or(T::ZERO).wrapping_add(last);
    Ok((out, total))
}

fn scan_block<T: Index>(data: &mut [T]) {
    let mut acc = T::ZERO;
    for value in data {
        acc = acc.wrapping_add(*value);
        *value = acc;
    }
}
