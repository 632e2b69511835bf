//! Persistent GPU resources: geometry buffers, the shared uniform buffer,
//! the single dynamic-offset bind group, and the render pipeline.

use crate::geometry::{MeshData, FLOATS_PER_VERTEX};
use crate::gpu::GpuContext;
use crate::layout::{InstanceUniform, LayoutError, UniformPlan};

const VERTEX_STRIDE: u64 = FLOATS_PER_VERTEX as u64 * 4; // 2 position + 3 color floats

/// Pad index bytes with zeros up to a 4-byte multiple, as required for the
/// buffer upload. The pad bytes sit past the logical index count and are
/// never addressed by a draw.
pub fn padded_index_bytes(indices: &[u16]) -> Vec<u8> {
    let mut bytes = bytemuck::cast_slice(indices).to_vec();
    while bytes.len() % wgpu::COPY_BUFFER_ALIGNMENT as usize != 0 {
        bytes.push(0);
    }
    bytes
}

pub struct FrameResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
    plan: UniformPlan,
    index_count: u32,
}

impl FrameResources {
    pub fn new(
        gpu: &GpuContext,
        surface_format: wgpu::TextureFormat,
        mesh: &MeshData,
        instance_count: usize,
    ) -> Result<Self, LayoutError> {
        let plan = UniformPlan::new(
            InstanceUniform::SIZE,
            gpu.min_uniform_offset_alignment(),
            instance_count,
        )?;
        log::info!(
            "uniform plan: {} instances, stride {} bytes, buffer {} bytes",
            plan.instance_count,
            plan.stride,
            plan.buffer_size
        );

        let vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Geometry Vertex Buffer"),
            size: (mesh.vertices.len() * 4) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Geometry Index Buffer"),
            size: padded_index_bytes(&mesh.indices).len() as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Uniform Buffer"),
            size: plan.buffer_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = Self::create_bind_group_layout(gpu);
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Instance Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(InstanceUniform::SIZE),
                }),
            }],
        });

        let shader = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Instance Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/instance.wgsl").into()),
        });
        let pipeline = Self::create_render_pipeline(gpu, &shader, &bind_group_layout, surface_format);

        Ok(Self {
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            bind_group,
            pipeline,
            plan,
            index_count: mesh.indices.len() as u32,
        })
    }

    /// Copy both geometry arrays into their buffers. Called exactly once,
    /// before the first frame.
    pub fn upload_geometry(&self, gpu: &GpuContext, mesh: &MeshData) {
        gpu.queue
            .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        gpu.queue
            .write_buffer(&self.index_buffer, 0, &padded_index_bytes(&mesh.indices));
    }

    /// Write one instance's uniform block at its planned offset. Safe to call
    /// between frames; the write lands before later-submitted draws read it.
    pub fn write_uniform(
        &self,
        gpu: &GpuContext,
        instance: usize,
        block: &InstanceUniform,
    ) -> Result<(), LayoutError> {
        let offset = self.plan.offset_for(instance)?;
        gpu.queue
            .write_buffer(&self.uniform_buffer, offset, bytemuck::bytes_of(block));
        Ok(())
    }

    /// The shared bind group plus the dynamic offset selecting one instance's
    /// block. Never allocates; the bind group identity is stable across
    /// calls.
    pub fn bind_group_for(
        &self,
        instance: usize,
    ) -> Result<(&wgpu::BindGroup, wgpu::DynamicOffset), LayoutError> {
        let offset = self.plan.offset_for(instance)?;
        Ok((&self.bind_group, offset as wgpu::DynamicOffset))
    }

    pub fn instance_count(&self) -> usize {
        self.plan.instance_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.index_buffer
    }

    fn create_bind_group_layout(gpu: &GpuContext) -> wgpu::BindGroupLayout {
        gpu.device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Instance Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(InstanceUniform::SIZE),
                    },
                    count: None,
                }],
            })
    }

    fn create_render_pipeline(
        gpu: &GpuContext,
        shader: &wgpu::ShaderModule,
        bind_group_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = gpu
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Instance Pipeline Layout"),
                bind_group_layouts: &[bind_group_layout],
                push_constant_ranges: &[],
            });

        gpu.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Instance Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: "vs_main",
                    buffers: &[Self::vertex_buffer_layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    unclipped_depth: false,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            })
    }

    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 2 * 4,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
