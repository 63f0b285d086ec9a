//! Batched immediate-mode rendering.
//!
//! Convention:
//! - Positions are in pixels (top-left origin, +Y down) under the default
//!   orthographic projection.
//! - Transforms are baked into vertices at emission; the model matrix
//!   uploaded at flush is identity.
//! - Filled geometry goes to the fill lane (triangles, textured program);
//!   outlines go to the stroke lane (lines, simple program).

mod accumulator;
mod backend;
mod batch;
mod config;
mod ctx;
mod device;
mod flush;
mod lane;
mod recording;
mod renderer;
mod shape;
mod state;
mod texture;
mod vertex;

pub use accumulator::GeometryAccumulator;
pub use backend::{GpuImage, WgpuDevice};
pub use batch::{Batch, BatchList};
pub use config::RendererConfig;
pub use ctx::{RenderCtx, RenderTarget};
pub use device::{GraphicsDevice, LaneKind, MatrixUniforms, ShaderProgram, Topology};
pub use flush::FlushStats;
pub use lane::{GeometryLane, DEFAULT_GROWTH_CHUNK_BYTES};
pub use recording::{DeviceCall, RecordingDevice};
pub use renderer::{FrameStats, Renderer};
pub use shape::ShapeKind;
pub use state::RenderState;
pub use texture::{Image, TextureId, NATIVE_SIZE};
pub use vertex::{FillVertex, StrokeVertex};
