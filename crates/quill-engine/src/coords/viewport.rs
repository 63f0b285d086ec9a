use glam::Mat4;

/// Depth range covered by the default orthographic projection.
const DEPTH_RANGE: f32 = 1000.0;

/// Viewport size in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Orthographic projection mapping logical pixels (top-left origin, +Y down)
    /// to clip space. `z` in `[-1000, 1000]` stays inside the depth range.
    pub fn ortho_projection(self) -> Mat4 {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        Mat4::orthographic_rh(0.0, w, h, 0.0, -DEPTH_RANGE, DEPTH_RANGE)
    }
}
