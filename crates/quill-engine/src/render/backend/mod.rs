//! wgpu backend: the two fixed programs, lane buffers and texture registry.

mod device;
mod image;
mod pipeline;
mod shader;

pub use device::WgpuDevice;
pub use image::GpuImage;
