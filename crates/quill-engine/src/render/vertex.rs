//! Lane vertex formats.
//!
//! Both formats are the binary contract with the shader programs: tightly
//! packed `f32` fields with a fixed stride per lane.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::paint::Color;

/// Fill-lane vertex (36 bytes, 9 floats):
///
///  offset  0  position  [f32; 3]   loc 0
///  offset 12  color     [f32; 4]   loc 1
///  offset 28  uv        [f32; 2]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct FillVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl FillVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x2  // uv
    ];

    #[inline]
    pub fn new(position: Vec3, color: Color, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            uv,
        }
    }

    /// Returns a copy with the position mapped through `m`.
    #[inline]
    pub fn baked(self, m: &Mat4) -> Self {
        Self {
            position: m.transform_point3(Vec3::from_array(self.position)).to_array(),
            ..self
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FillVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Stroke-lane vertex (28 bytes, 7 floats):
///
///  offset  0  position  [f32; 3]   loc 0
///  offset 12  color     [f32; 4]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct StrokeVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl StrokeVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    #[inline]
    pub fn new(position: Vec3, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    #[inline]
    pub fn baked(self, m: &Mat4) -> Self {
        Self {
            position: m.transform_point3(Vec3::from_array(self.position)).to_array(),
            ..self
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StrokeVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_float_counts() {
        assert_eq!(std::mem::size_of::<FillVertex>(), 9 * 4);
        assert_eq!(std::mem::size_of::<StrokeVertex>(), 7 * 4);
    }

    #[test]
    fn fill_vertex_bytes_are_xyzrgbauv() {
        let v = FillVertex {
            position: [1.0, 2.0, 3.0],
            color: [4.0, 5.0, 6.0, 7.0],
            uv: [8.0, 9.0],
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn baked_moves_position_only() {
        let v = StrokeVertex::new(Vec3::new(1.0, 1.0, 0.0), Color::BLACK);
        let b = v.baked(&Mat4::from_translation(Vec3::new(10.0, 20.0, 0.0)));
        assert_eq!(b.position, [11.0, 21.0, 0.0]);
        assert_eq!(b.color, v.color);
    }
}
