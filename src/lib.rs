//! trueno-csr: offset-array primitives for CSR graphs
//!
//! # Overview
//!
//! Two bulk operations on CSR offset arrays, each with a host backend (rayon)
//! and an optional GPU backend (wgpu):
//!
//! - **Chunk partitioning**: split the edge range into chunks of about N edges
//!   whose boundaries never fall inside a vertex's edge list
//! - **Offset expansion**: turn `[0, 3, 3, 5]` into `[0, 0, 0, 2, 2]`, one group
//!   id per entry, via a histogram of group starts and an inclusive scan
//!
//! Plus [`DeviceOptional`], the value-plus-flag pair kernels use in place of
//! `Option<T>`.
//!
//! # Quick Start
//!
//! ```
//! use trueno_csr::{chunk_partition, expand_offsets, HostStream, SystemAllocator};
//!
//! let stream = HostStream::default();
//! let offsets: [u32; 5] = [0, 4, 5, 9, 10];
//!
//! // Which vertex owns each edge
//! let sources: Vec<u32> = expand_offsets(&stream, &SystemAllocator, &offsets, 0).unwrap();
//! assert_eq!(sources, vec![0, 0, 0, 0, 1, 2, 2, 2, 2, 3]);
//!
//! // Chunks of about 3 edges, snapped to vertex boundaries
//! let chunks = chunk_partition(&stream, &SystemAllocator, &offsets, 4_u32, 10_u32, 3).unwrap();
//! assert_eq!(chunks.vertex_boundaries(), &[0, 1, 3, 3, 4]);
//! assert_eq!(chunks.edge_boundaries(), &[0, 4, 9, 9, 10]);
//! ```
//!
//! # Architecture
//!
//! - **Algorithms**: chunking, expansion and prefix scan over `&[impl Index]`
//! - **Exec**: [`HostStream`] execution context and injected [`BufferAllocator`]s
//! - **Storage**: validated [`OffsetArray`] and a [`CsrGraph`] built on it
//! - **GPU** (feature `gpu`): the same primitives as WGSL kernels

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod config;
pub mod error;
pub mod exec;
pub mod index;
pub mod optional;
pub mod storage;

// GPU backend (optional)
#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export core types
pub use algorithms::{
    chunk_partition, exclusive_scan, expand_offsets, expand_offsets_lenient,
    inclusive_scan_in_place, ChunkBoundaries, EdgeChunk,
};
pub use config::KernelConfig;
pub use error::OffsetError;
pub use exec::{BufferAllocator, HostStream, SystemAllocator, TrackingAllocator};
pub use index::Index;
pub use optional::DeviceOptional;
pub use storage::{validate_offsets, CsrGraph, NodeId, OffsetArray};

#[cfg(feature = "gpu")]
pub use gpu::{
    gpu_chunk_partition, gpu_expand_offsets, gpu_inclusive_scan, GpuDevice, GpuMemoryLimits,
    GpuOffsets,
};

// Error type
pub use anyhow::{Error, Result};
