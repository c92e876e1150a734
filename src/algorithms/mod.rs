//! Offset-array primitives (chunking, histogram expansion, scan)
//!
//! Host backend: every pass runs on a [`HostStream`](crate::HostStream) and
//! allocates through an injected [`BufferAllocator`](crate::BufferAllocator).

pub mod chunk;
pub mod expand;
pub mod scan;

pub use chunk::{chunk_partition, ChunkBoundaries, EdgeChunk};
pub use expand::{expand_offsets, expand_offsets_lenient};
pub use scan::{exclusive_scan, inclusive_scan_in_place};
