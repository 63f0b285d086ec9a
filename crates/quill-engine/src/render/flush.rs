//! Lane flushing.
//!
//! One upload per lane, one program bind, one uniform write, then draws:
//! one per batch for fill, one for the whole stroke lane.

use super::accumulator::GeometryAccumulator;
use super::device::{GraphicsDevice, LaneKind, MatrixUniforms};

/// Work issued by one lane flush.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FlushStats {
    pub vertices: u32,
    pub batches: u32,
    pub draw_calls: u32,
}

impl FlushStats {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draw_calls == 0
    }
}

impl std::ops::AddAssign for FlushStats {
    fn add_assign(&mut self, rhs: Self) {
        self.vertices += rhs.vertices;
        self.batches += rhs.batches;
        self.draw_calls += rhs.draw_calls;
    }
}

/// Uploads and draws the fill lane batch by batch, then clears it.
pub(crate) fn flush_fill<D: GraphicsDevice>(
    device: &mut D,
    geometry: &mut GeometryAccumulator,
    uniforms: &MatrixUniforms,
) -> FlushStats {
    let (lane, batches) = geometry.fill_parts_mut();
    if lane.is_empty() {
        batches.clear();
        return FlushStats::default();
    }
    debug_assert!(batches.covers(lane.len() as u32));

    device.upload(LaneKind::Fill, lane.as_bytes());
    device.use_program(LaneKind::Fill.program());
    device.set_matrices(uniforms);

    for batch in batches.as_slice() {
        device.bind_texture(batch.texture);
        device.draw(LaneKind::Fill.topology(), batch.range());
    }

    let stats = FlushStats {
        vertices: lane.len() as u32,
        batches: batches.len() as u32,
        draw_calls: batches.len() as u32,
    };

    lane.clear();
    batches.clear();
    stats
}

/// Uploads the stroke lane and draws it with a single line-list call, then clears it.
pub(crate) fn flush_stroke<D: GraphicsDevice>(
    device: &mut D,
    geometry: &mut GeometryAccumulator,
    uniforms: &MatrixUniforms,
) -> FlushStats {
    let lane = geometry.stroke_mut();
    if lane.is_empty() {
        return FlushStats::default();
    }

    let count = lane.len() as u32;
    device.upload(LaneKind::Stroke, lane.as_bytes());
    device.use_program(LaneKind::Stroke.program());
    device.set_matrices(uniforms);
    device.draw(LaneKind::Stroke.topology(), 0..count);

    lane.clear();
    FlushStats {
        vertices: count,
        batches: 0,
        draw_calls: 1,
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::paint::Color;
    use crate::render::device::{ShaderProgram, Topology};
    use crate::render::recording::{DeviceCall, RecordingDevice};
    use crate::render::texture::TextureId;
    use crate::render::vertex::{FillVertex, StrokeVertex};

    fn uniforms() -> MatrixUniforms {
        MatrixUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }

    fn tri() -> [FillVertex; 3] {
        [FillVertex::new(Vec3::ZERO, Color::WHITE, [0.0, 0.0]); 3]
    }

    #[test]
    fn empty_lanes_issue_no_calls() {
        let mut dev = RecordingDevice::new();
        let mut geo = GeometryAccumulator::new(8, 8, 1024);
        assert!(flush_fill(&mut dev, &mut geo, &uniforms()).is_empty());
        assert!(flush_stroke(&mut dev, &mut geo, &uniforms()).is_empty());
        assert!(dev.calls().is_empty());
        assert!(geo.batches().is_empty());
    }

    #[test]
    fn fill_issues_upload_program_uniforms_then_batches() {
        let mut dev = RecordingDevice::new();
        let mut geo = GeometryAccumulator::new(8, 8, 1024);
        geo.add_fill(&Mat4::IDENTITY, TextureId(1), &tri());
        geo.add_fill(&Mat4::IDENTITY, TextureId(2), &tri());

        let stats = flush_fill(&mut dev, &mut geo, &uniforms());
        assert_eq!(stats, FlushStats { vertices: 6, batches: 2, draw_calls: 2 });

        let calls = dev.calls();
        assert!(matches!(calls[0], DeviceCall::Upload { lane: LaneKind::Fill, ref bytes } if bytes.len() == 6 * 36));
        assert_eq!(calls[1], DeviceCall::UseProgram(ShaderProgram::Textured));
        assert!(matches!(calls[2], DeviceCall::SetMatrices(_)));
        assert_eq!(calls[3], DeviceCall::BindTexture(TextureId(1)));
        assert_eq!(calls[4], DeviceCall::Draw { topology: Topology::TriangleList, vertices: 0..3 });
        assert_eq!(calls[5], DeviceCall::BindTexture(TextureId(2)));
        assert_eq!(calls[6], DeviceCall::Draw { topology: Topology::TriangleList, vertices: 3..6 });

        assert!(geo.fill().is_empty());
        assert!(geo.batches().is_empty());
    }

    #[test]
    fn stroke_is_one_line_list_draw() {
        let mut dev = RecordingDevice::new();
        let mut geo = GeometryAccumulator::new(8, 8, 1024);
        let v = StrokeVertex::new(Vec3::ZERO, Color::BLACK);
        geo.add_stroke(&Mat4::IDENTITY, &[v, v, v, v]);

        let stats = flush_stroke(&mut dev, &mut geo, &uniforms());
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(dev.draws(), vec![(Topology::LineList, 0..4)]);
        assert!(dev.calls().contains(&DeviceCall::UseProgram(ShaderProgram::Simple)));
        assert!(geo.stroke().is_empty());
    }

    #[test]
    fn flush_keeps_capacity() {
        let mut dev = RecordingDevice::new();
        let mut geo = GeometryAccumulator::new(3, 8, 36);
        for _ in 0..10 {
            geo.add_fill(&Mat4::IDENTITY, TextureId(1), &tri());
        }
        let cap = geo.fill().capacity();
        flush_fill(&mut dev, &mut geo, &uniforms());
        assert_eq!(geo.fill().capacity(), cap);
    }
}
