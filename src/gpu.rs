use anyhow::Result;
use std::sync::Arc;

/// Handler for device-reported asynchronous notifications. Observational
/// only; implementations must not touch renderer state.
pub trait DeviceNotifications: Send + Sync + 'static {
    fn uncaptured_error(&self, error: &wgpu::Error);
    fn submitted_work_done(&self) {}
}

/// Default handler that forwards notifications to the log.
pub struct LogNotifications;

impl DeviceNotifications for LogNotifications {
    fn uncaptured_error(&self, error: &wgpu::Error) {
        log::error!("uncaptured device error: {error}");
    }

    fn submitted_work_done(&self) {
        log::trace!("queue work done");
    }
}

pub struct GpuContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    pub async fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("Failed to find suitable adapter"))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Primary Device"),
                    required_features: wgpu::Features::default(),
                    required_limits: wgpu::Limits::default(),
                },
                None, // Trace path
            )
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Device-reported minimum byte alignment for dynamic uniform offsets.
    /// Read once at startup; stable for the process lifetime.
    pub fn min_uniform_offset_alignment(&self) -> u64 {
        self.device.limits().min_uniform_buffer_offset_alignment as u64
    }

    /// Route uncaptured device errors through the given handler.
    pub fn install_error_handler(&self, handler: Arc<dyn DeviceNotifications>) {
        self.device.on_uncaptured_error(Box::new(move |error| {
            handler.uncaptured_error(&error);
        }));
    }

    /// Ask the queue to call the handler once currently submitted work is
    /// done. Dispatched only when the device is polled.
    pub fn notify_when_idle(&self, handler: Arc<dyn DeviceNotifications>) {
        self.queue.on_submitted_work_done(move || {
            handler.submitted_work_done();
        });
    }
}
