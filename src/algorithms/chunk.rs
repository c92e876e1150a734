//! Offset-aligned edge chunking
//!
//! Splits the edge range of a CSR offset array into contiguous chunks of
//! roughly equal size without ever splitting a vertex's edge list. Used to size
//! multi-pass kernels that cannot hold the whole edge list at once.
//!
//! ```text
//! offsets: [0, 4, 5, 9, 10]      chunk size 3 → 4 chunks, targets 3, 6, 9
//!
//!   target 3 → first vertex with offset ≥ 3 is 1 (offset 4)
//!   target 6 → vertex 3 (offset 9)
//!   target 9 → vertex 3 (offset 9)
//!
//! vertex boundaries: [0, 1, 3, 3, 4]
//! edge boundaries:   [0, 4, 9, 9, 10]
//! ```

use crate::error::OffsetError;
use crate::exec::{BufferAllocator, HostStream};
use crate::index::Index;
use anyhow::Result;
use rayon::prelude::*;
use std::ops::Range;
use tracing::debug;

/// Vertex-space and edge-space cut points of a chunked edge list
///
/// Both sequences have length `num_chunks + 1`, start at 0 and end at the
/// vertex / edge totals. `edge[i] == offsets[vertex[i]]` for every `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBoundaries<V, E> {
    vertex: Vec<V>,
    edge: Vec<E>,
}

/// One chunk as half-open vertex and edge ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeChunk {
    /// Vertices whose edges are all in this chunk
    pub vertices: Range<usize>,

    /// Edge positions covered by this chunk
    pub edges: Range<usize>,
}

impl<V: Index, E: Index> ChunkBoundaries<V, E> {
    #[cfg_attr(not(feature = "gpu"), allow(dead_code))]
    pub(crate) fn from_parts(vertex: Vec<V>, edge: Vec<E>) -> Self {
        debug_assert_eq!(vertex.len(), edge.len());
        Self { vertex, edge }
    }

    /// Vertex-space cut points
    #[must_use]
    pub fn vertex_boundaries(&self) -> &[V] {
        &self.vertex
    }

    /// Edge-space cut points
    #[must_use]
    pub fn edge_boundaries(&self) -> &[E] {
        &self.edge
    }

    /// Number of chunks (`len - 1`)
    #[must_use]
    pub fn num_chunks(&self) -> usize {
        self.vertex.len().saturating_sub(1)
    }

    /// Iterate over chunks in order
    pub fn chunks(&self) -> impl Iterator<Item = EdgeChunk> + '_ {
        self.vertex
            .windows(2)
            .zip(self.edge.windows(2))
            .map(|(v, e)| EdgeChunk {
                vertices: v[0].to_usize()..v[1].to_usize(),
                edges: e[0].to_usize()..e[1].to_usize(),
            })
    }

    /// Split into `(vertex_boundaries, edge_boundaries)`
    #[must_use]
    pub fn into_parts(self) -> (Vec<V>, Vec<E>) {
        (self.vertex, self.edge)
    }
}

/// Partition a CSR edge range into chunks of about `approx_edge_chunk_size` edges
///
/// `num_chunks = ceil(num_edges / approx_edge_chunk_size)`. Interior cut points
/// are the first vertices whose offset reaches each multiple of the chunk size,
/// so a chunk may be larger than requested when a vertex's edges straddle a
/// target. With one chunk or fewer the result is `([0, num_vertices], [0, num_edges])`.
///
/// # Errors
///
/// Returns `OffsetError` if the chunk size is zero, the offset array length is
/// not `num_vertices + 1`, the first offset is not zero, the last offset is
/// not `num_edges`, or the allocator refuses a result buffer. Monotonicity is
/// not re-checked; use [`validate_offsets`](crate::validate_offsets) for that.
///
/// # Example
///
/// ```
/// use trueno_csr::{chunk_partition, HostStream, SystemAllocator};
///
/// let offsets = [0_u64, 4, 5, 9, 10];
/// let chunks = chunk_partition(&HostStream::global(), &SystemAllocator, &offsets, 4_u32, 10_u64, 3)
///     .unwrap();
///
/// assert_eq!(chunks.vertex_boundaries(), &[0, 1, 3, 3, 4]);
/// assert_eq!(chunks.edge_boundaries(), &[0, 4, 9, 9, 10]);
/// ```
pub fn chunk_partition<V, E, A>(
    stream: &HostStream,
    alloc: &A,
    offsets: &[E],
    num_vertices: V,
    num_edges: E,
    approx_edge_chunk_size: usize,
) -> Result<ChunkBoundaries<V, E>>
where
    V: Index,
    E: Index,
    A: BufferAllocator,
{
    let nv = num_vertices.to_usize();
    let ne = num_edges.to_usize();

    check_chunk_inputs(offsets, nv, ne, approx_edge_chunk_size)?;

    let num_chunks = ne.div_ceil(approx_edge_chunk_size);
    debug!(
        stream = stream.id(),
        num_vertices = nv,
        num_edges = ne,
        chunk_size = approx_edge_chunk_size,
        num_chunks,
        "chunk_partition"
    );

    if num_chunks <= 1 {
        let mut vertex = alloc.allocate_zeroed::<V>(2)?;
        let mut edge = alloc.allocate_zeroed::<E>(2)?;
        vertex[1] = num_vertices;
        edge[1] = num_edges;
        return Ok(ChunkBoundaries { vertex, edge });
    }

    let mut vertex = alloc.allocate_zeroed::<V>(num_chunks + 1)?;
    let mut edge = alloc.allocate_zeroed::<E>(num_chunks + 1)?;
    vertex[num_chunks] = num_vertices;
    edge[num_chunks] = num_edges;

    let cut = |k: usize, v: &mut V, e: &mut E| -> Result<(), OffsetError> {
        let target = (k + 1) * approx_edge_chunk_size;
        let idx = offsets.partition_point(|o| o.to_usize() < target);
        *v = V::try_from_usize(idx)?;
        *e = offsets[idx];
        Ok(())
    };

    let interior_v = &mut vertex[1..num_chunks];
    let interior_e = &mut edge[1..num_chunks];

    if stream.is_parallel(interior_v.len()) {
        stream.install(|| {
            interior_v
                .par_iter_mut()
                .zip(interior_e.par_iter_mut())
                .enumerate()
                .try_for_each(|(k, (v, e))| cut(k, v, e))
        })?;
    } else {
        interior_v
            .iter_mut()
            .zip(interior_e.iter_mut())
            .enumerate()
            .try_for_each(|(k, (v, e))| cut(k, v, e))?;
    }

    stream.synchronize();
    Ok(ChunkBoundaries { vertex, edge })
}

fn check_chunk_inputs<E: Index>(
    offsets: &[E],
    num_vertices: usize,
    num_edges: usize,
    chunk_size: usize,
) -> Result<(), OffsetError> {
    if chunk_size == 0 {
        return Err(OffsetError::ZeroChunkSize);
    }
    if offsets.len() != num_vertices + 1 {
        return Err(OffsetError::LengthMismatch {
            expected: num_vertices + 1,
            actual: offsets.len(),
        });
    }

    let first = offsets[0].to_usize();
    if first != 0 {
        return Err(OffsetError::NonZeroBase { first });
    }

    let last = offsets[num_vertices].to_usize();
    if last != num_edges {
        return Err(OffsetError::TotalMismatch {
            expected: num_edges,
            last,
        });
    }

    debug_assert!(
        offsets.windows(2).all(|w| w[0] <= w[1]),
        "offsets must be non-decreasing"
    );
    Ok(())
}
