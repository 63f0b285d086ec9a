use anyhow::{Context, Result};

use crate::render::RenderCtx;

use super::{GpuInit, OffscreenFrame};

/// Owns the wgpu core objects for offscreen rendering.
///
/// No surface is created; frames render into textures allocated by
/// [`begin_offscreen`](Self::begin_offscreen).
pub struct Gpu {
    /// Logical device.
    device: wgpu::Device,

    /// Command queue.
    queue: wgpu::Queue,

    /// Format of every offscreen target.
    target_format: wgpu::TextureFormat,
}

impl Gpu {
    /// Acquires an adapter and device without a surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new_headless(init: GpuInit) -> Result<Self> {
        let GpuInit {
            power_preference,
            target_format,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("quill device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self {
            device,
            queue,
            target_format,
        })
    }

    /// Returns the offscreen target format.
    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Context for creating a `WgpuDevice` that renders into this GPU's targets.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(&self.device, &self.queue, self.target_format)
    }

    /// Allocates a `width` × `height` color target and creates an encoder.
    pub fn begin_offscreen(&self, width: u32, height: u32) -> Result<OffscreenFrame> {
        anyhow::ensure!(width > 0 && height > 0, "offscreen target has zero size");

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quill offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.target_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quill frame encoder"),
            });

        Ok(OffscreenFrame {
            texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and returns the rendered texture.
    pub fn submit(&self, frame: OffscreenFrame) -> wgpu::Texture {
        let OffscreenFrame {
            texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        texture
    }
}
