//! Quill engine crate.
//!
//! Batched immediate-mode 2D/3D drawing: a transform stack, fill and stroke
//! geometry lanes, texture batching and a flush onto a `GraphicsDevice`.
//! The wgpu backend and headless device layer live alongside.

pub mod device;
pub mod error;
pub mod logging;

pub mod coords;
pub mod paint;
pub mod render;
pub mod transform;

pub use error::RenderError;
