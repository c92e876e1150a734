//! GPU offset-aligned edge chunking
//!
//! Same contract as [`chunk_partition`](crate::chunk_partition); all interior
//! cut points are searched and gathered by one kernel dispatch.

use super::buffer::GpuOffsets;
use super::kernel::{encode_pass, storage_entry, uniform_entry, Kernel, WORKGROUP_SIZE};
use super::GpuDevice;
use crate::algorithms::ChunkBoundaries;
use crate::error::OffsetError;
use anyhow::Result;
use tracing::debug;

const SHADER: &str = include_str!("shaders/chunk_search.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ChunkParams {
    num_offsets: u32,
    num_targets: u32,
    chunk_size: u32,
    _pad: u32,
}

/// Partition a device-resident offset array into chunks of about
/// `approx_edge_chunk_size` edges
///
/// Blocks until the boundaries have been read back.
///
/// # Errors
///
/// Returns `OffsetError` on a zero chunk size, a mismatched vertex count, or
/// (for host-uploaded offsets) a last offset other than `num_edges`; or an
/// error if a GPU operation fails
///
/// # Example
///
/// ```ignore
/// # use trueno_csr::gpu::{gpu_chunk_partition, GpuDevice, GpuOffsets};
/// let device = GpuDevice::new().await?;
/// let offsets = GpuOffsets::upload(&device, &[0, 4, 5, 9, 10])?;
/// let chunks = gpu_chunk_partition(&device, &offsets, 4, 10, 3).await?;
/// assert_eq!(chunks.vertex_boundaries(), &[0, 1, 3, 3, 4]);
/// ```
pub async fn gpu_chunk_partition(
    device: &GpuDevice,
    offsets: &GpuOffsets,
    num_vertices: u32,
    num_edges: u32,
    approx_edge_chunk_size: u32,
) -> Result<ChunkBoundaries<u32, u32>> {
    if approx_edge_chunk_size == 0 {
        return Err(OffsetError::ZeroChunkSize.into());
    }
    if offsets.len() != num_vertices as usize + 1 {
        return Err(OffsetError::LengthMismatch {
            expected: num_vertices as usize + 1,
            actual: offsets.len(),
        }
        .into());
    }
    if let Some(last) = offsets.total().filter(|&last| last != num_edges) {
        return Err(OffsetError::TotalMismatch {
            expected: num_edges as usize,
            last: last as usize,
        }
        .into());
    }

    let num_chunks = num_edges.div_ceil(approx_edge_chunk_size);
    debug!(
        num_vertices,
        num_edges,
        chunk_size = approx_edge_chunk_size,
        num_chunks,
        "gpu_chunk_partition"
    );

    if num_chunks <= 1 {
        return Ok(ChunkBoundaries::from_parts(
            vec![0, num_vertices],
            vec![0, num_edges],
        ));
    }

    let bounds_len = num_chunks as usize + 1;
    let mut initial_vertex = vec![0_u32; bounds_len];
    let mut initial_edge = vec![0_u32; bounds_len];
    initial_vertex[bounds_len - 1] = num_vertices;
    initial_edge[bounds_len - 1] = num_edges;

    let usage = wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC;
    let vertex_bounds = device.create_buffer_init(
        "Chunk Vertex Bounds",
        bytemuck::cast_slice(&initial_vertex),
        usage,
    )?;
    let edge_bounds = device.create_buffer_init(
        "Chunk Edge Bounds",
        bytemuck::cast_slice(&initial_edge),
        usage,
    )?;

    let num_targets = num_chunks - 1;
    let params = device.create_buffer_init(
        "Chunk Params",
        bytemuck::bytes_of(&ChunkParams {
            num_offsets: offsets.len_u32(),
            num_targets,
            chunk_size: approx_edge_chunk_size,
            _pad: 0,
        }),
        wgpu::BufferUsages::UNIFORM,
    )?;

    let kernel = Kernel::new(
        device,
        "Chunk Search Shader",
        SHADER,
        &[
            uniform_entry(0),
            storage_entry(1, true),
            storage_entry(2, false),
            storage_entry(3, false),
        ],
    );
    let pipeline = kernel.pipeline(device, "search_chunk_boundaries");
    let bind_group = kernel.bind(
        device,
        "Chunk Search Bind Group",
        &[&params, &offsets.buffer, &vertex_bounds, &edge_bounds],
    );

    let mut encoder = device
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Chunk Search Encoder"),
        });
    encode_pass(
        &mut encoder,
        "Chunk Search Pass",
        &pipeline,
        &bind_group,
        num_targets.div_ceil(WORKGROUP_SIZE),
    );
    device.queue().submit(Some(encoder.finish()));

    let vertex = device.read_buffer(&vertex_bounds, 0, bounds_len).await?;
    let edge = device.read_buffer(&edge_bounds, 0, bounds_len).await?;

    Ok(ChunkBoundaries::from_parts(vertex, edge))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gpu_chunk_partition_snaps_to_vertices() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_chunk_partition_snaps_to_vertices: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let offsets = GpuOffsets::upload(&device, &[0, 4, 5, 9, 10]).unwrap();
        let chunks = gpu_chunk_partition(&device, &offsets, 4, 10, 3).await.unwrap();

        assert_eq!(chunks.vertex_boundaries(), &[0, 1, 3, 3, 4]);
        assert_eq!(chunks.edge_boundaries(), &[0, 4, 9, 9, 10]);
    }

    #[tokio::test]
    async fn test_gpu_chunk_partition_single_chunk() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_chunk_partition_single_chunk: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let offsets = GpuOffsets::upload(&device, &[0, 2, 3]).unwrap();
        let chunks = gpu_chunk_partition(&device, &offsets, 2, 3, 100).await.unwrap();

        assert_eq!(chunks.vertex_boundaries(), &[0, 2]);
        assert_eq!(chunks.edge_boundaries(), &[0, 3]);
    }

    #[tokio::test]
    async fn test_gpu_chunk_partition_rejects_bad_inputs() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_gpu_chunk_partition_rejects_bad_inputs: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let offsets = GpuOffsets::upload(&device, &[0, 2, 3]).unwrap();

        let err = gpu_chunk_partition(&device, &offsets, 2, 3, 0).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<OffsetError>(),
            Some(&OffsetError::ZeroChunkSize)
        );
        assert!(gpu_chunk_partition(&device, &offsets, 5, 3, 1).await.is_err());
    }
}
