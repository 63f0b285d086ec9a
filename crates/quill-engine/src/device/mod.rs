//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - allocating offscreen color targets and their encoders

mod frame;
mod gpu;
mod init;

pub use frame::OffscreenFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
