//! GPU inclusive prefix scan
//!
//! Recursive block scan: scan 256-element blocks, scan the block totals with the
//! same kernels, then add each block's carry. Depth is `log256(len)`.

use super::kernel::{encode_pass, storage_entry, uniform_entry, Kernel, WORKGROUP_SIZE};
use super::GpuDevice;
use anyhow::{anyhow, Result};

const SHADER: &str = include_str!("shaders/scan.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ScanParams {
    len: u32,
    num_blocks: u32,
    _pad0: u32,
    _pad1: u32,
}

/// Compiled scan pipelines
pub(crate) struct ScanKernels {
    kernel: Kernel,
    scan_blocks: wgpu::ComputePipeline,
    add_block_sums: wgpu::ComputePipeline,
}

/// Temporaries that must outlive the submission of the encoder they were recorded into
#[derive(Default)]
pub(crate) struct Scratch {
    buffers: Vec<wgpu::Buffer>,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl Scratch {
    pub(crate) fn keep_buffer(&mut self, buffer: wgpu::Buffer) {
        self.buffers.push(buffer);
    }

    pub(crate) fn keep_bind_group(&mut self, bind_group: wgpu::BindGroup) {
        self.bind_groups.push(bind_group);
    }
}

impl ScanKernels {
    pub(crate) fn new(device: &GpuDevice) -> Self {
        let kernel = Kernel::new(
            device,
            "Scan Shader",
            SHADER,
            &[
                uniform_entry(0),
                storage_entry(1, false),
                storage_entry(2, false),
            ],
        );
        let scan_blocks = kernel.pipeline(device, "scan_blocks");
        let add_block_sums = kernel.pipeline(device, "add_block_sums");

        Self {
            kernel,
            scan_blocks,
            add_block_sums,
        }
    }

    /// Record an in-place inclusive scan of the first `len` u32s of `data`
    pub(crate) fn encode(
        &self,
        device: &GpuDevice,
        encoder: &mut wgpu::CommandEncoder,
        data: &wgpu::Buffer,
        len: u32,
        scratch: &mut Scratch,
    ) -> Result<()> {
        if len == 0 {
            return Ok(());
        }

        let num_blocks = len.div_ceil(WORKGROUP_SIZE);
        let params = device.create_buffer_init(
            "Scan Params",
            bytemuck::bytes_of(&ScanParams {
                len,
                num_blocks,
                _pad0: 0,
                _pad1: 0,
            }),
            wgpu::BufferUsages::UNIFORM,
        )?;
        let block_sums = device.create_buffer(
            "Scan Block Sums",
            u64::from(num_blocks) * 4,
            wgpu::BufferUsages::STORAGE,
        )?;

        let bind_group = self
            .kernel
            .bind(device, "Scan Bind Group", &[&params, data, &block_sums]);

        encode_pass(encoder, "Scan Blocks", &self.scan_blocks, &bind_group, num_blocks);

        if num_blocks > 1 {
            self.encode(device, encoder, &block_sums, num_blocks, scratch)?;
            encode_pass(
                encoder,
                "Add Block Sums",
                &self.add_block_sums,
                &bind_group,
                num_blocks,
            );
        }

        scratch.keep_buffer(params);
        scratch.keep_buffer(block_sums);
        scratch.keep_bind_group(bind_group);
        Ok(())
    }
}

/// Inclusive prefix scan of `data` on the GPU (wrapping u32 addition)
///
/// # Errors
///
/// Returns error if `data` has more than `u32::MAX` elements or a GPU
/// operation fails
pub async fn gpu_inclusive_scan(device: &GpuDevice, data: &[u32]) -> Result<Vec<u32>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let len = u32::try_from(data.len()).map_err(|_| anyhow!("Scan input too large"))?;

    let buffer = device.create_buffer_init(
        "Scan Data",
        bytemuck::cast_slice(data),
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
    )?;

    let kernels = ScanKernels::new(device);
    let mut scratch = Scratch::default();
    let mut encoder = device
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scan Encoder"),
        });
    kernels.encode(device, &mut encoder, &buffer, len, &mut scratch)?;
    device.queue().submit(Some(encoder.finish()));

    let scanned = device.read_buffer(&buffer, 0, data.len()).await?;
    drop(scratch);
    Ok(scanned)
}
