//! CSR (Compressed Sparse Row) graph representation
//!
//! Based on `GraphBLAST` (Yang et al., ACM `ToMS` 2022) for GPU-optimized sparse matrix operations.
//!
//! # CSR Format
//!
//! ```text
//! Graph: 0 → 1, 0 → 2, 1 → 2
//!
//! CSR:
//!   row_offsets: [0, 2, 3, 3]  // Node 0: edges [0..2), Node 1: [2..3), Node 2: [3..3)
//!   col_indices: [1, 2, 2]      // Edge 0 → node 1, edge 1 → node 2, edge 2 → node 2
//!   edge_sources: [0, 0, 1]     // expand_offsets(row_offsets)
//! ```

use super::offsets::OffsetArray;
use crate::algorithms::{ChunkBoundaries, EdgeChunk};
use crate::exec::{BufferAllocator, HostStream, SystemAllocator};
use anyhow::{anyhow, Result};

/// Node identifier (zero-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Forward CSR graph
///
/// # Example
///
/// ```
/// use trueno_csr::{CsrGraph, NodeId};
///
/// let graph = CsrGraph::from_edge_list(&[
///     (NodeId(0), NodeId(1), 1.0),
///     (NodeId(0), NodeId(2), 1.0),
/// ])
/// .unwrap();
///
/// assert_eq!(graph.outgoing_neighbors(NodeId(0)).unwrap(), &[1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct CsrGraph {
    /// Node i's edges are `col_indices[row_offsets[i]..row_offsets[i + 1]]`
    row_offsets: OffsetArray<u32>,

    /// Edge targets, length `num_edges`
    col_indices: Vec<u32>,

    /// Edge weights, length `num_edges`
    edge_weights: Vec<f32>,
}

impl CsrGraph {
    /// Create new empty graph
    #[must_use]
    pub fn new() -> Self {
        Self {
            row_offsets: OffsetArray::empty(),
            col_indices: Vec::new(),
            edge_weights: Vec::new(),
        }
    }

    /// Create graph from edge list
    ///
    /// Edges are grouped by source; edges sharing a source keep their input order.
    ///
    /// # Errors
    ///
    /// Returns error if the graph has more than `u32::MAX` edges
    pub fn from_edge_list(edges: &[(NodeId, NodeId, f32)]) -> Result<Self> {
        let Some(max_node) = edges.iter().flat_map(|(src, dst, _)| [src.0, dst.0]).max() else {
            return Ok(Self::new());
        };
        let num_nodes = max_node as usize + 1;

        let mut sorted: Vec<&(NodeId, NodeId, f32)> = edges.iter().collect();
        sorted.sort_by_key(|(src, _, _)| *src);

        let sources: Vec<u32> = sorted.iter().map(|(src, _, _)| src.0).collect();
        let row_offsets = OffsetArray::from_sorted_majors(
            &HostStream::global(),
            &SystemAllocator,
            &sources,
            num_nodes,
        )?;

        Ok(Self {
            row_offsets,
            col_indices: sorted.iter().map(|(_, dst, _)| dst.0).collect(),
            edge_weights: sorted.iter().map(|(_, _, w)| *w).collect(),
        })
    }

    /// Number of nodes
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.row_offsets.num_groups()
    }

    /// Number of edges
    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.col_indices.len()
    }

    /// Get outgoing neighbors of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn outgoing_neighbors(&self, node: NodeId) -> Result<&[u32]> {
        let range = self.edge_range(node)?;
        Ok(&self.col_indices[range])
    }

    /// Get out-degree of a node
    ///
    /// # Errors
    ///
    /// Returns error if node ID is out of bounds
    pub fn out_degree(&self, node: NodeId) -> Result<usize> {
        Ok(self.edge_range(node)?.len())
    }

    fn edge_range(&self, node: NodeId) -> Result<std::ops::Range<usize>> {
        let idx = node.0 as usize;
        if idx >= self.num_nodes() {
            return Err(anyhow!("Node ID {} out of bounds", node.0));
        }
        let offsets = self.row_offsets.as_slice();
        Ok(offsets[idx] as usize..offsets[idx + 1] as usize)
    }

    /// Row offsets (length `num_nodes + 1`)
    #[must_use]
    pub fn row_offsets(&self) -> &OffsetArray<u32> {
        &self.row_offsets
    }

    /// Get raw CSR components (`row_offsets`, `col_indices`, `edge_weights`)
    #[must_use]
    pub fn csr_components(&self) -> (&[u32], &[u32], &[f32]) {
        (
            self.row_offsets.as_slice(),
            &self.col_indices,
            &self.edge_weights,
        )
    }

    /// Source node of every edge, in CSR order (the COO major column)
    ///
    /// # Errors
    ///
    /// Returns error if allocation fails
    pub fn edge_sources<A: BufferAllocator>(
        &self,
        stream: &HostStream,
        alloc: &A,
    ) -> Result<Vec<u32>> {
        self.row_offsets.expand(stream, alloc, 0)
    }

    /// Split the edge list into node-aligned chunks of about `approx_chunk_size` edges
    ///
    /// # Errors
    ///
    /// Returns error if `approx_chunk_size` is zero
    pub fn edge_chunks(
        &self,
        stream: &HostStream,
        approx_chunk_size: usize,
    ) -> Result<ChunkBoundaries<u32, u32>> {
        self.row_offsets
            .chunk(stream, &SystemAllocator, approx_chunk_size)
    }

    /// Edges `(source, target, weight)` of one chunk
    ///
    /// # Errors
    ///
    /// Returns error if the chunk does not belong to this graph
    pub fn chunk_edges(&self, chunk: &EdgeChunk) -> Result<Vec<(u32, u32, f32)>> {
        if chunk.edges.end > self.num_edges() || chunk.vertices.end > self.num_nodes() {
            return Err(anyhow!("Chunk {chunk:?} exceeds graph bounds"));
        }

        let offsets = self.row_offsets.as_slice();
        let mut edges = Vec::with_capacity(chunk.edges.len());
        for src in chunk.vertices.clone() {
            #[allow(clippy::cast_possible_truncation)] // node ids are u32 by construction
            let src_id = src as u32;
            for e in offsets[src] as usize..offsets[src + 1] as usize {
                edges.push((src_id, self.col_indices[e], self.edge_weights[e]));
            }
        }
        Ok(edges)
    }
}

impl Default for CsrGraph {
    fn default() -> Self {
        Self::new()
    }
}
