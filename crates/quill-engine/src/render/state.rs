use crate::paint::Color;

/// Per-renderer color state read at emission time.
///
/// Disabling fill or stroke keeps the stored color, so re-enabling restores it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderState {
    pub fill_color: Color,
    pub fill_enabled: bool,
    pub stroke_color: Color,
    pub stroke_enabled: bool,
    /// Vertex color applied to images. White leaves texels unchanged.
    pub tint: Color,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            fill_color: Color::WHITE,
            fill_enabled: true,
            stroke_color: Color::BLACK,
            stroke_enabled: true,
            tint: Color::WHITE,
        }
    }
}

impl RenderState {
    /// Fill color if filling is enabled.
    #[inline]
    pub fn active_fill(&self) -> Option<Color> {
        self.fill_enabled.then_some(self.fill_color)
    }

    /// Stroke color if stroking is enabled.
    #[inline]
    pub fn active_stroke(&self) -> Option<Color> {
        self.stroke_enabled.then_some(self.stroke_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_lanes_keep_their_color() {
        let mut s = RenderState::default();
        s.fill_color = Color::rgb(1.0, 0.0, 0.0);
        s.fill_enabled = false;
        assert_eq!(s.active_fill(), None);

        s.fill_enabled = true;
        assert_eq!(s.active_fill(), Some(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(s.active_stroke(), Some(Color::BLACK));
    }
}
