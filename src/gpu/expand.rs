//! GPU offset expansion
//!
//! Mirrors [`expand_offsets_lenient`](crate::expand_offsets_lenient): the
//! output length is the last offset, group starts are scattered with atomic
//! increments into a cleared buffer, and an inclusive scan turns the histogram
//! into group ids.

use super::buffer::GpuOffsets;
use super::kernel::{encode_pass, storage_entry, uniform_entry, Kernel, WORKGROUP_SIZE};
use super::scan::{ScanKernels, Scratch};
use super::GpuDevice;
use crate::optional::DeviceOptional;
use anyhow::Result;
use tracing::debug;

const SHADER: &str = include_str!("shaders/expand_scatter.wgsl");

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ExpandParams {
    num_offsets: u32,
    output_len: u32,
    base: DeviceOptional<u32>,
}

/// Expand a device-resident offset array into one group id per entry
///
/// `base_idx` is added to every id. The last offset is read back first to size
/// the output; an offset array whose first entry is non-zero therefore behaves
/// like the lenient host variant.
///
/// # Errors
///
/// Returns error if a GPU operation fails
///
/// # Example
///
/// ```ignore
/// # use trueno_csr::gpu::{gpu_expand_offsets, GpuDevice, GpuOffsets};
/// let device = GpuDevice::new().await?;
/// let offsets = GpuOffsets::upload(&device, &[0, 3, 3, 5])?;
/// assert_eq!(gpu_expand_offsets(&device, &offsets, 0).await?, vec![0, 0, 0, 2, 2]);
/// ```
pub async fn gpu_expand_offsets(
    device: &GpuDevice,
    offsets: &GpuOffsets,
    base_idx: u32,
) -> Result<Vec<u32>> {
    let last: Vec<u32> = device.read_buffer(&offsets.buffer, offsets.len() - 1, 1).await?;
    let output_len = last.first().copied().unwrap_or(0);

    debug!(
        num_offsets = offsets.len(),
        output_len, base_idx, "gpu_expand_offsets"
    );

    if output_len == 0 {
        return Ok(Vec::new());
    }

    let output = device.create_buffer(
        "Expand Output",
        u64::from(output_len) * 4,
        wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::COPY_DST,
    )?;

    let num_offsets = offsets.len_u32();
    let params = device.create_buffer_init(
        "Expand Params",
        bytemuck::bytes_of(&ExpandParams {
            num_offsets,
            output_len,
            base: (base_idx != 0).then_some(base_idx).into(),
        }),
        wgpu::BufferUsages::UNIFORM,
    )?;

    let kernel = Kernel::new(
        device,
        "Expand Scatter Shader",
        SHADER,
        &[
            uniform_entry(0),
            storage_entry(1, true),
            storage_entry(2, false),
        ],
    );
    let pipeline = kernel.pipeline(device, "scatter_group_starts");
    let bind_group = kernel.bind(
        device,
        "Expand Scatter Bind Group",
        &[&params, &offsets.buffer, &output],
    );

    let scan = ScanKernels::new(device);
    let mut scratch = Scratch::default();
    let mut encoder = device
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Expand Encoder"),
        });

    encoder.clear_buffer(&output, 0, None);
    encode_pass(
        &mut encoder,
        "Expand Scatter Pass",
        &pipeline,
        &bind_group,
        num_offsets.div_ceil(WORKGROUP_SIZE),
    );
    scan.encode(device, &mut encoder, &output, output_len, &mut scratch)?;
    device.queue().submit(Some(encoder.finish()));

    let ids = device.read_buffer(&output, 0, output_len as usize).await?;
    drop(scratch);
    Ok(ids)
}
