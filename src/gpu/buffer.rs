//! Device-resident offset arrays
//!
//! Offsets uploaded from the host are validated first. Buffers produced on the
//! device can be wrapped as-is; their contents are the caller's responsibility.

use super::GpuDevice;
use crate::error::OffsetError;
use crate::storage::{validate_offsets, CsrGraph};
use anyhow::{anyhow, Result};

/// Offset array uploaded to the GPU (u32 entries)
#[derive(Debug)]
pub struct GpuOffsets {
    /// Number of offsets (`num_groups + 1`)
    len: usize,

    /// Last offset, when known on the host
    total: Option<u32>,

    /// Storage buffer holding the offsets
    pub buffer: wgpu::Buffer,
}

impl GpuOffsets {
    /// Validate and upload an offset array
    ///
    /// # Errors
    ///
    /// Returns error if `offsets` is not a valid offset array or has more than
    /// `u32::MAX` entries
    pub fn upload(device: &GpuDevice, offsets: &[u32]) -> Result<Self> {
        validate_offsets(offsets)?;
        u32::try_from(offsets.len()).map_err(|_| anyhow!("Offset array too large for GPU kernels"))?;

        let buffer = device.create_buffer_init(
            "Offsets",
            bytemuck::cast_slice(offsets),
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::COPY_DST,
        )?;

        Ok(Self {
            len: offsets.len(),
            total: offsets.last().copied(),
            buffer,
        })
    }

    /// Wrap a device buffer holding `len` u32 offsets (e.g. a scan result)
    ///
    /// The buffer needs `STORAGE | COPY_SRC` usage.
    ///
    /// # Errors
    ///
    /// Returns error if `len` is zero, exceeds `u32::MAX`, or is larger than the buffer
    pub fn from_buffer(buffer: wgpu::Buffer, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(OffsetError::Empty.into());
        }
        u32::try_from(len).map_err(|_| anyhow!("Offset array too large for GPU kernels"))?;
        if buffer.size() < len as u64 * 4 {
            return Err(anyhow!(
                "Buffer of {} bytes cannot hold {len} offsets",
                buffer.size()
            ));
        }

        Ok(Self {
            len,
            total: None,
            buffer,
        })
    }

    /// Upload the row offsets of a CSR graph
    ///
    /// # Errors
    ///
    /// Returns error if buffer creation fails
    pub fn from_csr_graph(device: &GpuDevice, graph: &CsrGraph) -> Result<Self> {
        Self::upload(device, graph.row_offsets().as_slice())
    }

    /// Number of offsets
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Number of groups (`len - 1`)
    #[must_use]
    pub const fn num_groups(&self) -> usize {
        self.len - 1
    }

    /// Last offset if it was known at upload time
    #[must_use]
    pub const fn total(&self) -> Option<u32> {
        self.total
    }

    /// Always false: a valid offset array has at least one entry
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `len` as the u32 the kernels take
    #[allow(clippy::cast_possible_truncation)] // checked in `upload`
    pub(crate) const fn len_u32(&self) -> u32 {
        self.len as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;

    #[tokio::test]
    async fn test_upload_offsets() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_upload_offsets: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let offsets = GpuOffsets::upload(&device, &[0, 2, 2, 5]).unwrap();

        assert_eq!(offsets.len(), 4);
        assert_eq!(offsets.num_groups(), 3);
        assert_eq!(offsets.total(), Some(5));
        let back: Vec<u32> = device.read_buffer(&offsets.buffer, 0, 4).await.unwrap();
        assert_eq!(back, vec![0, 2, 2, 5]);
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_offsets() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_upload_rejects_invalid_offsets: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        assert!(GpuOffsets::upload(&device, &[]).is_err());
        assert!(GpuOffsets::upload(&device, &[1, 2]).is_err());
        assert!(GpuOffsets::upload(&device, &[0, 3, 2]).is_err());
    }

    #[tokio::test]
    async fn test_upload_csr_graph() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_upload_csr_graph: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let graph = CsrGraph::from_edge_list(&[
            (NodeId(0), NodeId(1), 1.0),
            (NodeId(1), NodeId(2), 1.0),
        ])
        .unwrap();

        let offsets = GpuOffsets::from_csr_graph(&device, &graph).unwrap();
        assert_eq!(offsets.num_groups(), 3);
    }
}
