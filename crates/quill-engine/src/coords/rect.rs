use glam::Vec2;

/// Axis-aligned rectangle in local coordinates (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Corners in emission order: top-left, top-right, bottom-right, bottom-left.
    ///
    /// Quads are triangulated as `(0, 1, 2), (2, 3, 0)` over these corners.
    /// Negative sizes are kept as given so mirrored rects flip their winding
    /// the same way the caller's coordinates do.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        let Vec2 { x, y } = self.origin;
        let Vec2 { x: w, y: h } = self.size;
        [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── corners ───────────────────────────────────────────────────────────

    #[test]
    fn corners_start_at_origin_and_run_clockwise_on_screen() {
        let c = r(1.0, 2.0, 10.0, 20.0).corners();
        assert_eq!(c[0], Vec2::new(1.0, 2.0));
        assert_eq!(c[1], Vec2::new(11.0, 2.0));
        assert_eq!(c[2], Vec2::new(11.0, 22.0));
        assert_eq!(c[3], Vec2::new(1.0, 22.0));
    }

    #[test]
    fn negative_size_mirrors_corners() {
        let c = r(10.0, 0.0, -4.0, 5.0).corners();
        assert_eq!(c[1], Vec2::new(6.0, 0.0));
        assert_eq!(c[3], Vec2::new(10.0, 5.0));
    }
}
