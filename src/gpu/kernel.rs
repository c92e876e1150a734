//! Shared compute-pipeline plumbing for the WGSL kernels

use super::GpuDevice;

/// Threads per workgroup in every shader
pub(crate) const WORKGROUP_SIZE: u32 = 256;

/// Per-dimension dispatch limit guaranteed by `wgpu::Limits::default()`
const MAX_WORKGROUPS_PER_DIM: u32 = 65_535;

/// `@binding(n)` uniform block visible to compute
pub(crate) const fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// `@binding(n)` storage buffer visible to compute
pub(crate) const fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Compiled shader module with its bind group layout
pub(crate) struct Kernel {
    pub(crate) layout: wgpu::BindGroupLayout,
    module: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
}

impl Kernel {
    /// Compile `source` and build a layout from `entries`
    pub(crate) fn new(
        device: &GpuDevice,
        label: &str,
        source: &str,
        entries: &[wgpu::BindGroupLayoutEntry],
    ) -> Self {
        let module = device
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

        let layout = device
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries,
            });

        let pipeline_layout =
            device
                .device()
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(label),
                    bind_group_layouts: &[&layout],
                    push_constant_ranges: &[],
                });

        Self {
            layout,
            module,
            pipeline_layout,
        }
    }

    /// Pipeline for one entry point of the module
    pub(crate) fn pipeline(&self, device: &GpuDevice, entry_point: &str) -> wgpu::ComputePipeline {
        device
            .device()
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(entry_point),
                layout: Some(&self.pipeline_layout),
                module: &self.module,
                entry_point,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
    }

    /// Bind `buffers` to bindings `0..buffers.len()` in order
    pub(crate) fn bind(&self, device: &GpuDevice, label: &str, buffers: &[&wgpu::Buffer]) -> wgpu::BindGroup {
        let entries: Vec<wgpu::BindGroupEntry<'_>> = buffers
            .iter()
            .zip(0_u32..)
            .map(|(buffer, binding)| wgpu::BindGroupEntry {
                binding,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        device
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.layout,
                entries: &entries,
            })
    }
}

/// Workgroup grid covering `num_workgroups` groups, folded into 2D past the per-dimension limit
///
/// Shaders linearize with `wid.y * num_workgroups.x + wid.x` and bounds-check.
pub(crate) fn dispatch_dims(num_workgroups: u32) -> (u32, u32) {
    let num_workgroups = num_workgroups.max(1);
    let x = num_workgroups.min(MAX_WORKGROUPS_PER_DIM);
    (x, num_workgroups.div_ceil(x))
}

/// Record one compute pass
pub(crate) fn encode_pass(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    pipeline: &wgpu::ComputePipeline,
    bind_group: &wgpu::BindGroup,
    num_workgroups: u32,
) {
    let (x, y) = dispatch_dims(num_workgroups);
    let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
        label: Some(label),
        timestamp_writes: None,
    });
    compute_pass.set_pipeline(pipeline);
    compute_pass.set_bind_group(0, bind_group, &[]);
    compute_pass.dispatch_workgroups(x, y, 1);
}
