use glam::Mat4;

use super::batch::BatchList;
use super::lane::GeometryLane;
use super::texture::TextureId;
use super::vertex::{FillVertex, StrokeVertex};

/// The two vertex lanes plus the fill lane's batch partition.
///
/// Every append bakes the supplied model matrix into the vertex positions and,
/// for the fill lane, updates the batch list in the same call so the batches
/// always partition the lane.
#[derive(Debug)]
pub struct GeometryAccumulator {
    fill: GeometryLane<FillVertex>,
    stroke: GeometryLane<StrokeVertex>,
    batches: BatchList,
}

impl GeometryAccumulator {
    pub fn new(fill_capacity: usize, stroke_capacity: usize, chunk_bytes: usize) -> Self {
        Self {
            fill: GeometryLane::new("fill", fill_capacity, chunk_bytes),
            stroke: GeometryLane::new("stroke", stroke_capacity, chunk_bytes),
            batches: BatchList::with_capacity(64),
        }
    }

    #[inline]
    pub fn fill(&self) -> &GeometryLane<FillVertex> {
        &self.fill
    }

    #[inline]
    pub fn stroke(&self) -> &GeometryLane<StrokeVertex> {
        &self.stroke
    }

    #[inline]
    pub fn batches(&self) -> &BatchList {
        &self.batches
    }

    /// Appends one fill vertex bound to `texture`.
    pub fn add_fill_vertex(&mut self, transform: &Mat4, texture: TextureId, v: FillVertex) {
        self.fill.push(v.baked(transform));
        self.batches.record(1, texture, self.fill_len());
    }

    /// Appends one stroke vertex.
    pub fn add_stroke_vertex(&mut self, transform: &Mat4, v: StrokeVertex) {
        self.stroke.push(v.baked(transform));
    }

    /// Appends a run of fill vertices (whole triangles) bound to `texture`.
    pub fn add_fill(&mut self, transform: &Mat4, texture: TextureId, vs: &[FillVertex]) {
        if vs.is_empty() {
            return;
        }
        debug_assert!(vs.len() % 3 == 0, "fill lane expects whole triangles");
        self.fill.reserve(vs.len());
        for v in vs {
            self.fill.push(v.baked(transform));
        }
        self.batches.record(vs.len() as u32, texture, self.fill_len());
        debug_assert!(self.batches.covers(self.fill_len()));
    }

    /// Appends a run of stroke vertices (whole segments).
    pub fn add_stroke(&mut self, transform: &Mat4, vs: &[StrokeVertex]) {
        debug_assert!(vs.len() % 2 == 0, "stroke lane expects vertex pairs");
        self.stroke.reserve(vs.len());
        for v in vs {
            self.stroke.push(v.baked(transform));
        }
    }

    #[inline]
    pub(crate) fn fill_len(&self) -> u32 {
        self.fill.len() as u32
    }

    /// Splits borrows for the flusher: fill lane + batches, both mutable.
    pub(crate) fn fill_parts_mut(&mut self) -> (&mut GeometryLane<FillVertex>, &mut BatchList) {
        (&mut self.fill, &mut self.batches)
    }

    pub(crate) fn stroke_mut(&mut self) -> &mut GeometryLane<StrokeVertex> {
        &mut self.stroke
    }

    pub(crate) fn growth_events(&self) -> u32 {
        self.fill.growth_events() + self.stroke.growth_events()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::paint::Color;

    const T: TextureId = TextureId(7);

    fn fv(x: f32, y: f32) -> FillVertex {
        FillVertex::new(Vec3::new(x, y, 0.0), Color::WHITE, [0.0, 0.0])
    }

    #[test]
    fn fill_positions_are_baked() {
        let mut acc = GeometryAccumulator::new(16, 16, 1024);
        let m = Mat4::from_translation(Vec3::new(100.0, 50.0, 0.0));
        acc.add_fill(&m, T, &[fv(0.0, 0.0), fv(1.0, 0.0), fv(1.0, 1.0)]);
        assert_eq!(acc.fill().as_slice()[0].position, [100.0, 50.0, 0.0]);
        assert_eq!(acc.fill().as_slice()[2].position, [101.0, 51.0, 0.0]);
    }

    #[test]
    fn single_fill_vertices_keep_batches_in_sync() {
        let mut acc = GeometryAccumulator::new(4, 4, 1024);
        for i in 0..5 {
            acc.add_fill_vertex(&Mat4::IDENTITY, T, fv(i as f32, 0.0));
            assert!(acc.batches().covers(acc.fill_len()));
        }
        assert_eq!(acc.batches().len(), 1);
        assert_eq!(acc.batches().as_slice()[0].count, 5);
    }

    #[test]
    fn stroke_lane_grows_instead_of_dropping() {
        let mut acc = GeometryAccumulator::new(0, 2, std::mem::size_of::<StrokeVertex>());
        let v = StrokeVertex::new(Vec3::ZERO, Color::BLACK);
        for _ in 0..50 {
            acc.add_stroke(&Mat4::IDENTITY, &[v, v]);
        }
        assert_eq!(acc.stroke().len(), 100);
        assert!(acc.stroke().growth_events() > 0);
    }
}
