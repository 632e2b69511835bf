pub mod frame;
pub mod geometry;
pub mod gpu;
pub mod layout;
pub mod resources;
pub mod scheduler;

use frame::{drive_frame, FrameLedger, FrameOutcome, FrameSource};
use geometry::MeshData;
use gpu::GpuContext;
use layout::{InstanceUniform, LayoutError};
use resources::FrameResources;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.9,
    g: 0.1,
    b: 0.2,
    a: 1.0,
};

/// Per-instance tints, cycled when more instances than entries are drawn.
const TINT_PALETTE: [[f32; 4]; 4] = [
    [0.0, 1.0, 0.4, 1.0],
    [1.0, 1.0, 1.0, 0.7],
    [0.4, 0.6, 1.0, 1.0],
    [1.0, 0.5, 0.2, 0.9],
];

fn tint_for(instance: usize) -> [f32; 4] {
    TINT_PALETTE[instance % TINT_PALETTE.len()]
}

/// Frame source backed by the window surface. Acquisition failure stops the
/// render loop rather than being retried.
struct SurfaceFrames<'a> {
    surface: &'a wgpu::Surface<'static>,
}

impl FrameSource for SurfaceFrames<'_> {
    type Frame = wgpu::SurfaceTexture;

    fn acquire(&mut self) -> Option<wgpu::SurfaceTexture> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(err) => {
                log::warn!("surface acquisition failed, stopping render loop: {err}");
                None
            }
        }
    }

    fn present(&mut self, frame: wgpu::SurfaceTexture) {
        frame.present();
    }
}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    resources: FrameResources,
    ledger: FrameLedger,
}

impl Renderer {
    pub fn new(
        window: &winit::window::Window,
        gpu: &GpuContext,
        mesh: &MeshData,
        instance_count: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let surface = unsafe {
            gpu.instance
                .create_surface_unsafe(wgpu::SurfaceTargetUnsafe::from_window(window)?)?
        };

        let surface_caps = surface.get_capabilities(&gpu.adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &config);

        let resources = FrameResources::new(gpu, config.format, mesh, instance_count)?;
        resources.upload_geometry(gpu, mesh);
        for instance in 0..instance_count {
            resources.write_uniform(gpu, instance, &InstanceUniform::new(tint_for(instance), 0.0))?;
        }

        Ok(Self {
            surface,
            config,
            resources,
            ledger: FrameLedger::default(),
        })
    }

    pub fn resize(&mut self, gpu: &GpuContext, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&gpu.device, &self.config);
        }
    }

    /// Write the animation time into every instance block. The writes land
    /// before draws submitted afterwards on the same queue read the buffer.
    pub fn update_time(&self, gpu: &GpuContext, time: f32) -> Result<(), LayoutError> {
        for instance in 0..self.resources.instance_count() {
            self.resources
                .write_uniform(gpu, instance, &InstanceUniform::new(tint_for(instance), time))?;
        }
        Ok(())
    }

    /// One frame cycle: acquire the surface frame, encode one render pass
    /// drawing every instance at its dynamic offset, submit, present. All
    /// transient frame resources are dropped before returning.
    pub fn render_frame(&mut self, gpu: &GpuContext) -> Result<FrameOutcome, LayoutError> {
        let resources = &self.resources;
        let bindings = (0..resources.instance_count())
            .map(|instance| resources.bind_group_for(instance))
            .collect::<Result<Vec<_>, _>>()?;

        let mut source = SurfaceFrames {
            surface: &self.surface,
        };
        let outcome = drive_frame(&mut source, &mut self.ledger, |frame| {
            let view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());
            let mut encoder = gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Frame Encoder"),
                });
            {
                let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Instance Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                render_pass.set_pipeline(resources.pipeline());
                render_pass.set_vertex_buffer(0, resources.vertex_buffer().slice(..));
                render_pass
                    .set_index_buffer(resources.index_buffer().slice(..), wgpu::IndexFormat::Uint16);
                for (bind_group, offset) in &bindings {
                    render_pass.set_bind_group(0, *bind_group, &[*offset]);
                    render_pass.draw_indexed(0..resources.index_count(), 0, 0..1);
                }
            }
            gpu.queue.submit(Some(encoder.finish()));
        });
        Ok(outcome)
    }

    pub fn ledger(&self) -> &FrameLedger {
        &self.ledger
    }
}
