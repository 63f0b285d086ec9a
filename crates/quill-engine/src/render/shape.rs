//! Tessellation helpers shared by the primitive builders.
//!
//! All helpers append local-space vertices to caller-owned buffers; the
//! renderer bakes the transform when it hands them to the accumulator.

use glam::{Vec2, Vec3};
use lyon_path::Path;
use lyon_path::math::point;
use lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex as TessVertex, VertexBuffers,
};

use crate::paint::Color;

use super::vertex::{FillVertex, StrokeVertex};

/// UVs for quad corners in emission order (TL, TR, BR, BL).
pub(crate) const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Two-triangle fan over quad corners.
pub(crate) const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 2, 3, 0];

/// How `begin_shape` / `end_shape` interprets the recorded vertices.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ShapeKind {
    /// One simple polygon, filled and outlined along its edges.
    #[default]
    Polygon,
    /// Every three vertices form an independent triangle.
    Triangles,
    /// Every two vertices form an independent line segment (stroke only).
    Lines,
}

/// Vertices recorded between `begin_shape` and `end_shape`.
#[derive(Debug, Default)]
pub(crate) struct ShapeBuilder {
    pub kind: ShapeKind,
    pub points: Vec<Vec3>,
}

impl ShapeBuilder {
    pub fn begin(&mut self, kind: ShapeKind) {
        self.kind = kind;
        self.points.clear();
    }
}

pub(crate) fn fill_quad(out: &mut Vec<FillVertex>, corners: [Vec3; 4], color: Color) {
    for &i in &QUAD_TRIANGLES {
        out.push(FillVertex::new(corners[i], color, QUAD_UVS[i]));
    }
}

/// Fills a simple polygon, convex or not, using the non-zero fill rule.
///
/// Triangles are filled as given. Larger outlines are tessellated in the XY
/// plane with `z` carried as an interpolated attribute. Outlines the
/// tessellator rejects emit nothing.
pub(crate) fn fill_polygon(out: &mut Vec<FillVertex>, points: &[Vec3], color: Color) {
    match points.len() {
        0..=2 => {}
        3 => out.extend(points.iter().map(|&p| FillVertex::new(p, color, [0.0, 0.0]))),
        _ => tessellate_fill(out, points, color),
    }
}

fn tessellate_fill(out: &mut Vec<FillVertex>, points: &[Vec3], color: Color) {
    let mut builder = Path::builder_with_attributes(1);
    builder.begin(point(points[0].x, points[0].y), &[points[0].z]);
    for p in &points[1..] {
        builder.line_to(point(p.x, p.y), &[p.z]);
    }
    builder.end(true);
    let path = builder.build();

    let mut geom: VertexBuffers<[f32; 3], u32> = VertexBuffers::new();
    let options = FillOptions::default().with_fill_rule(FillRule::NonZero);
    let result = FillTessellator::new().tessellate_path(
        path.as_slice(),
        &options,
        &mut BuffersBuilder::new(&mut geom, |mut v: TessVertex| {
            let p = v.position();
            let z = v.interpolated_attributes()[0];
            [p.x, p.y, z]
        }),
    );
    if let Err(e) = result {
        log::warn!("polygon fill of {} points failed: {e:?}", points.len());
        return;
    }

    out.extend(geom.indices.iter().map(|&i| {
        FillVertex::new(Vec3::from_array(geom.vertices[i as usize]), color, [0.0, 0.0])
    }));
}

/// Independent triangles; a trailing partial triangle is dropped.
pub(crate) fn fill_triangles(out: &mut Vec<FillVertex>, points: &[Vec3], color: Color) {
    for tri in points.chunks_exact(3) {
        for &p in tri {
            out.push(FillVertex::new(p, color, [0.0, 0.0]));
        }
    }
}

/// Segment pairs along `points`, plus the closing edge when `closed`.
///
/// Two points produce a single segment even when `closed`.
pub(crate) fn outline(out: &mut Vec<StrokeVertex>, points: &[Vec3], closed: bool, color: Color) {
    if points.len() < 2 {
        return;
    }
    for pair in points.windows(2) {
        out.push(StrokeVertex::new(pair[0], color));
        out.push(StrokeVertex::new(pair[1], color));
    }
    if closed && points.len() > 2 {
        out.push(StrokeVertex::new(points[points.len() - 1], color));
        out.push(StrokeVertex::new(points[0], color));
    }
}

/// Independent segments; a trailing unpaired point is dropped.
pub(crate) fn segments(out: &mut Vec<StrokeVertex>, points: &[Vec3], color: Color) {
    for pair in points.chunks_exact(2) {
        out.push(StrokeVertex::new(pair[0], color));
        out.push(StrokeVertex::new(pair[1], color));
    }
}

/// Points on an axis-aligned ellipse centered at `center` with the given diameters.
pub(crate) fn ellipse_points(out: &mut Vec<Vec3>, center: Vec2, size: Vec2, segments: u32) {
    let n = segments.max(3);
    let r = size * 0.5;
    out.extend((0..n).map(|i| {
        let t = i as f32 / n as f32 * std::f32::consts::TAU;
        Vec3::new(center.x + r.x * t.cos(), center.y + r.y * t.sin(), 0.0)
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(xy: &[(f32, f32)]) -> Vec<Vec3> {
        xy.iter().map(|&(x, y)| Vec3::new(x, y, 0.0)).collect()
    }

    // ── fill ──────────────────────────────────────────────────────────────

    #[test]
    fn quad_uses_two_triangle_fan() {
        let c = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let mut out = Vec::new();
        fill_quad(&mut out, c, Color::WHITE);
        let order: Vec<[f32; 3]> = out.iter().map(|v| v.position).collect();
        assert_eq!(
            order,
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
            ]
        );
        assert_eq!(out[2].uv, [1.0, 1.0]);
        assert_eq!(out[4].uv, [0.0, 1.0]);
    }

    fn triangle_area(t: &[FillVertex]) -> f32 {
        let [a, b, c] = [t[0].position, t[1].position, t[2].position];
        0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs()
    }

    fn covered_area(out: &[FillVertex]) -> f32 {
        out.chunks_exact(3).map(triangle_area).sum()
    }

    #[test]
    fn convex_polygon_covers_its_area() {
        let mut out = Vec::new();
        fill_polygon(&mut out, &pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (1.0, 3.0), (0.0, 2.0)]), Color::WHITE);
        assert_eq!(out.len() % 3, 0);
        assert!((covered_area(&out) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn concave_polygon_stays_inside_outline() {
        // L-shape: the notch (1..2, 1..2) must stay empty.
        let l = pts(&[(2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
        let mut out = Vec::new();
        fill_polygon(&mut out, &l, Color::WHITE);

        assert_eq!(out.len() % 3, 0);
        assert!((covered_area(&out) - 3.0).abs() < 1e-4);
        for tri in out.chunks_exact(3) {
            let cx = (tri[0].position[0] + tri[1].position[0] + tri[2].position[0]) / 3.0;
            let cy = (tri[0].position[1] + tri[1].position[1] + tri[2].position[1]) / 3.0;
            assert!(!(cx > 1.0 && cy > 1.0), "triangle centroid ({cx}, {cy}) in notch");
        }
    }

    #[test]
    fn polygon_keeps_depth_and_color() {
        let sq: Vec<Vec3> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| Vec3::new(x, y, -2.0))
            .collect();
        let mut out = Vec::new();
        fill_polygon(&mut out, &sq, Color::BLACK);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| (v.position[2] + 2.0).abs() < 1e-5));
        assert!(out.iter().all(|v| v.color == Color::BLACK.to_array()));
    }

    #[test]
    fn triangle_fill_keeps_vertex_order() {
        let tri = [Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 2.0), Vec3::new(1.0, 0.0, 3.0)];
        let mut out = Vec::new();
        fill_polygon(&mut out, &tri, Color::WHITE);
        let order: Vec<[f32; 3]> = out.iter().map(|v| v.position).collect();
        assert_eq!(order, vec![[0.0, 0.0, 1.0], [0.0, 1.0, 2.0], [1.0, 0.0, 3.0]]);
    }

    #[test]
    fn degenerate_polygon_emits_nothing() {
        let mut out = Vec::new();
        fill_polygon(&mut out, &pts(&[(0.0, 0.0), (1.0, 1.0)]), Color::WHITE);
        assert!(out.is_empty());
    }

    #[test]
    fn triangles_drop_trailing_partial() {
        let mut out = Vec::new();
        fill_triangles(&mut out, &pts(&[(0.0, 0.0); 7]), Color::WHITE);
        assert_eq!(out.len(), 6);
    }

    // ── stroke ────────────────────────────────────────────────────────────

    #[test]
    fn closed_outline_has_one_segment_per_edge() {
        let mut out = Vec::new();
        outline(&mut out, &pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]), true, Color::BLACK);
        assert_eq!(out.len(), 6);
        assert_eq!(out[4].position, [1.0, 1.0, 0.0]);
        assert_eq!(out[5].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn two_point_closed_outline_is_one_segment() {
        let mut out = Vec::new();
        outline(&mut out, &pts(&[(0.0, 0.0), (1.0, 0.0)]), true, Color::BLACK);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn segments_pair_points() {
        let mut out = Vec::new();
        segments(&mut out, &pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]), Color::BLACK);
        assert_eq!(out.len(), 2);
    }

    // ── ellipse ───────────────────────────────────────────────────────────

    #[test]
    fn ellipse_points_lie_on_radii() {
        let mut out = Vec::new();
        ellipse_points(&mut out, Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0), 8);
        assert_eq!(out.len(), 8);
        assert!((out[0] - Vec3::new(20.0, 10.0, 0.0)).length() < 1e-4);
        assert!((out[2] - Vec3::new(10.0, 15.0, 0.0)).length() < 1e-4);
    }
}
