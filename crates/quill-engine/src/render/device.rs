//! Graphics device seam.
//!
//! The renderer core never talks to a GPU API directly. Construction and
//! flushing go through [`GraphicsDevice`], which a backend implements
//! (see `WgpuDevice`, and `RecordingDevice` for tests and headless tooling).

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::error::RenderError;

use super::texture::TextureId;

/// The two fixed shader programs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderProgram {
    /// Position + color. Used by the stroke lane.
    Simple,
    /// Position + color + uv, sampled texture. Used by the fill lane.
    Textured,
}

/// Primitive topology of a draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Topology {
    LineList,
    TriangleList,
}

/// Vertex lane a device-side buffer belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LaneKind {
    Fill,
    Stroke,
}

impl LaneKind {
    #[inline]
    pub fn program(self) -> ShaderProgram {
        match self {
            LaneKind::Fill => ShaderProgram::Textured,
            LaneKind::Stroke => ShaderProgram::Simple,
        }
    }

    #[inline]
    pub fn topology(self) -> Topology {
        match self {
            LaneKind::Fill => Topology::TriangleList,
            LaneKind::Stroke => Topology::LineList,
        }
    }
}

/// Matrix uniform block shared by both programs (192 bytes).
///
/// `model` stays identity: model transforms are baked into vertices at
/// emission time. The slot is kept so both programs share one layout.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MatrixUniforms {
    pub projection: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
}

impl MatrixUniforms {
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            model: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Operations the renderer needs from a graphics device.
///
/// Calls arrive in flush order: one `upload` per lane, then program and
/// uniforms, then `bind_texture`/`draw` pairs. Implementations must preserve
/// that order when they execute.
pub trait GraphicsDevice {
    /// Compiles and links both shader programs.
    ///
    /// Called once during renderer construction; an error is fatal.
    fn prepare_programs(&mut self) -> Result<(), RenderError>;

    /// Creates an RGBA8 texture and returns its id.
    fn create_texture_rgba8(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, RenderError>;

    /// Releases a texture created by this device.
    fn release_texture(&mut self, id: TextureId);

    /// Replaces the device-side content of `lane` with `bytes`.
    fn upload(&mut self, lane: LaneKind, bytes: &[u8]);

    fn use_program(&mut self, program: ShaderProgram);

    fn set_matrices(&mut self, uniforms: &MatrixUniforms);

    fn bind_texture(&mut self, id: TextureId);

    /// Draws `vertices` from the most recently uploaded lane.
    fn draw(&mut self, topology: Topology, vertices: Range<u32>);
}

/// Lets a renderer borrow a device the caller keeps.
impl<D: GraphicsDevice + ?Sized> GraphicsDevice for &mut D {
    fn prepare_programs(&mut self) -> Result<(), RenderError> {
        (**self).prepare_programs()
    }

    fn create_texture_rgba8(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, RenderError> {
        (**self).create_texture_rgba8(width, height, pixels)
    }

    fn release_texture(&mut self, id: TextureId) {
        (**self).release_texture(id)
    }

    fn upload(&mut self, lane: LaneKind, bytes: &[u8]) {
        (**self).upload(lane, bytes)
    }

    fn use_program(&mut self, program: ShaderProgram) {
        (**self).use_program(program)
    }

    fn set_matrices(&mut self, uniforms: &MatrixUniforms) {
        (**self).set_matrices(uniforms)
    }

    fn bind_texture(&mut self, id: TextureId) {
        (**self).bind_texture(id)
    }

    fn draw(&mut self, topology: Topology, vertices: Range<u32>) {
        (**self).draw(topology, vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_is_three_mat4() {
        assert_eq!(std::mem::size_of::<MatrixUniforms>(), 3 * 64);
    }

    #[test]
    fn lanes_map_to_programs_and_topologies() {
        assert_eq!(LaneKind::Fill.program(), ShaderProgram::Textured);
        assert_eq!(LaneKind::Stroke.program(), ShaderProgram::Simple);
        assert_eq!(LaneKind::Stroke.topology(), Topology::LineList);
    }
}
