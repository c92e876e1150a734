//! GPU backend for the offset primitives
//!
//! Based on research from:
//! - **Merrill & Garland** (NVIDIA TR 2016) - single-pass parallel prefix scan
//! - **Gunrock** (Wang et al., ACM `ToPC` 2017) - load-balanced CSR partitioning
//!
//! # Architecture
//!
//! - `device`: GPU device initialization and buffer readback
//! - `buffer`: device-resident offset arrays
//! - `kernel`: shared pipeline plumbing for the WGSL shaders
//! - `scan`: recursive workgroup prefix scan
//! - `chunk`: offset-aligned edge chunking
//! - `expand`: histogram-then-scan offset expansion
//! - `memory`: VRAM limits and chunk sizing
//!
//! Every entry point records its passes into one command encoder, submits once
//! and blocks on readback, so results are complete when the future resolves.
//!
//! # Feature Flag
//!
//! This module is only available with the `gpu` feature flag:
//! ```bash
//! cargo build --features gpu
//! ```

mod buffer;
mod chunk;
mod device;
mod expand;
mod kernel;
mod memory;
mod scan;

pub use buffer::GpuOffsets;
pub use chunk::gpu_chunk_partition;
pub use device::{GpuDevice, GpuDeviceError};
pub use expand::gpu_expand_offsets;
pub use memory::{GpuMemoryLimits, VRAM_HEADROOM};
pub use scan::gpu_inclusive_scan;
