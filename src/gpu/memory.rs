//! GPU memory limits and chunk sizing
//!
//! Detects how much of an edge list one kernel pass can bind at once and turns
//! that into an `approx_edge_chunk_size` for the chunk partitioner.

use super::GpuDevice;

/// Share of reported VRAM used for graph data (the rest is headroom)
pub const VRAM_HEADROOM: f64 = 0.7;

/// GPU memory limits
#[derive(Debug, Clone)]
pub struct GpuMemoryLimits {
    /// Total VRAM estimate (bytes)
    pub total_vram: u64,

    /// VRAM usable for graph data (bytes)
    pub usable_vram: u64,

    /// Largest storage buffer a single binding may cover (bytes)
    pub max_binding_size: u64,
}

impl GpuMemoryLimits {
    /// Detect limits from the device
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn detect(device: &GpuDevice) -> Self {
        let limits = device.device().limits();

        // max_buffer_size is the best portable proxy for VRAM wgpu exposes
        let total_vram = limits.max_buffer_size;
        let usable_vram = (total_vram as f64 * VRAM_HEADROOM) as u64;

        Self {
            total_vram,
            usable_vram,
            max_binding_size: u64::from(limits.max_storage_buffer_binding_size),
        }
    }

    /// Check if `bytes` of graph data fit in usable VRAM
    #[must_use]
    pub const fn fits_in_vram(&self, bytes: u64) -> bool {
        bytes <= self.usable_vram
    }

    /// Edges per chunk so one chunk's per-edge arrays fit in a single binding
    ///
    /// `bytes_per_edge` is the sum of all per-edge element sizes a pass binds
    /// (e.g. 4 for u32 targets + 4 for f32 weights). Returns at least 1.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn recommended_edge_chunk_size(&self, bytes_per_edge: usize) -> usize {
        if bytes_per_edge == 0 {
            return usize::MAX;
        }
        let budget = self.max_binding_size.min(self.usable_vram);
        ((budget / bytes_per_edge as u64) as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> GpuMemoryLimits {
        GpuMemoryLimits {
            total_vram: 8 * 1024 * 1024 * 1024,
            usable_vram: 5 * 1024 * 1024 * 1024,
            max_binding_size: 128 * 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn test_memory_limits_detection() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_memory_limits_detection: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let limits = GpuMemoryLimits::detect(&device);

        assert!(limits.total_vram > 0);
        assert!(limits.usable_vram <= limits.total_vram);
        assert!(limits.max_binding_size > 0);
    }

    #[test]
    fn test_fits_in_vram() {
        let limits = limits();
        assert!(limits.fits_in_vram(4 * 1024 * 1024 * 1024));
        assert!(!limits.fits_in_vram(6 * 1024 * 1024 * 1024));
    }

    #[test]
    fn test_recommended_edge_chunk_size() {
        let limits = limits();

        // 128 MB binding / 8 bytes per edge
        assert_eq!(limits.recommended_edge_chunk_size(8), 16 * 1024 * 1024);
        assert_eq!(limits.recommended_edge_chunk_size(0), usize::MAX);

        let tiny = GpuMemoryLimits {
            total_vram: 16,
            usable_vram: 4,
            max_binding_size: 1024,
        };
        assert_eq!(tiny.recommended_edge_chunk_size(8), 1);
    }
}
