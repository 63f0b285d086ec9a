use glam::{Mat4, Vec2, Vec3};

use crate::coords::{Rect, Viewport};
use crate::error::RenderError;
use crate::paint::Color;
use crate::transform::TransformStack;

use super::accumulator::GeometryAccumulator;
use super::config::RendererConfig;
use super::device::{GraphicsDevice, MatrixUniforms};
use super::flush::{self, FlushStats};
use super::shape::{self, ShapeBuilder, ShapeKind};
use super::state::RenderState;
use super::texture::{resolve_size, Image, TextureId, NATIVE_SIZE};
use super::vertex::{FillVertex, StrokeVertex};

/// 1×1 opaque white, the batching key for untextured fills.
const DUMMY_PIXEL: [u8; 4] = [255, 255, 255, 255];

/// Work issued by one [`Renderer::flush`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub fill: FlushStats,
    pub stroke: FlushStats,
    /// Lane growth events since the previous `flush()`.
    pub growth_events: u32,
}

impl FrameStats {
    #[inline]
    pub fn draw_calls(&self) -> u32 {
        self.fill.draw_calls + self.stroke.draw_calls
    }
}

/// Batched immediate-mode renderer.
///
/// Primitive calls bake the current transform and color state into vertices
/// and append them to the stroke (line list) or fill (triangle list) lane.
/// Fill geometry is partitioned into texture-homogeneous batches in
/// submission order. `flush*` uploads each lane once, draws it and clears it.
///
/// Untextured fills bind an owned 1×1 white texture so they batch together
/// with each other, and never with a differently-textured image.
///
/// Each renderer owns its state: two instances never observe each other's
/// colors or transforms.
pub struct Renderer<D: GraphicsDevice> {
    device: D,
    config: RendererConfig,

    transform: TransformStack,
    state: RenderState,
    geometry: GeometryAccumulator,
    dummy_texture: TextureId,

    projection: Mat4,
    view: Mat4,

    shape: ShapeBuilder,
    shape_open: bool,
    scratch_points: Vec<Vec3>,
    scratch_fill: Vec<FillVertex>,
    scratch_stroke: Vec<StrokeVertex>,

    growth_seen: u32,
}

impl<D: GraphicsDevice> Renderer<D> {
    /// Creates a renderer on `device`.
    ///
    /// Fails if either shader program cannot be built or the dummy texture
    /// cannot be created; no partially working renderer is returned.
    pub fn new(mut device: D, config: RendererConfig) -> Result<Self, RenderError> {
        device.prepare_programs()?;
        let dummy_texture = device.create_texture_rgba8(1, 1, &DUMMY_PIXEL)?;

        log::debug!(
            "renderer created: fill capacity {}, stroke capacity {}, chunk {} bytes, dummy {:?}",
            config.fill_capacity,
            config.stroke_capacity,
            config.growth_chunk_bytes,
            dummy_texture
        );

        Ok(Self {
            device,
            transform: TransformStack::new(config.pop_policy),
            state: RenderState::default(),
            geometry: GeometryAccumulator::new(
                config.fill_capacity,
                config.stroke_capacity,
                config.growth_chunk_bytes,
            ),
            dummy_texture,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            shape: ShapeBuilder::default(),
            shape_open: false,
            scratch_points: Vec::new(),
            scratch_fill: Vec::new(),
            scratch_stroke: Vec::new(),
            growth_seen: 0,
            config,
        })
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn geometry(&self) -> &GeometryAccumulator {
        &self.geometry
    }

    #[inline]
    pub fn dummy_texture(&self) -> TextureId {
        self.dummy_texture
    }

    #[inline]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    #[inline]
    pub fn transform(&self) -> &TransformStack {
        &self.transform
    }

    // ── camera ────────────────────────────────────────────────────────────

    /// Sets the projection to the pixel-space orthographic projection of `viewport`.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            log::warn!("Renderer: ignoring invalid viewport {viewport:?}");
            return;
        }
        self.projection = viewport.ortho_projection();
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
    }

    // ── transform stack ───────────────────────────────────────────────────

    pub fn push(&mut self) {
        self.transform.push();
    }

    /// Restores the last pushed matrix. See [`PopPolicy`](crate::transform::PopPolicy).
    pub fn pop(&mut self) -> Result<(), RenderError> {
        self.transform.pop()
    }

    pub fn reset_matrix(&mut self) {
        self.transform.reset();
    }

    pub fn apply_matrix(&mut self, m: Mat4) {
        self.transform.apply(m);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.transform.translate(x, y);
    }

    pub fn translate_3d(&mut self, x: f32, y: f32, z: f32) {
        self.transform.translate_3d(x, y, z);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform.scale(sx, sy);
    }

    pub fn scale_3d(&mut self, sx: f32, sy: f32, sz: f32) {
        self.transform.scale_3d(sx, sy, sz);
    }

    pub fn rotate(&mut self, angle: f32) {
        self.transform.rotate(angle);
    }

    pub fn rotate_axis(&mut self, angle: f32, axis: Vec3) {
        self.transform.rotate_axis(angle, axis);
    }

    // ── color state ───────────────────────────────────────────────────────

    pub fn fill(&mut self, color: Color) {
        self.state.fill_color = color;
        self.state.fill_enabled = true;
    }

    pub fn no_fill(&mut self) {
        self.state.fill_enabled = false;
    }

    pub fn stroke(&mut self, color: Color) {
        self.state.stroke_color = color;
        self.state.stroke_enabled = true;
    }

    pub fn no_stroke(&mut self) {
        self.state.stroke_enabled = false;
    }

    pub fn tint(&mut self, color: Color) {
        self.state.tint = color;
    }

    pub fn no_tint(&mut self) {
        self.state.tint = Color::WHITE;
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Line segment from `(x1, y1)` to `(x2, y2)`. Stroke only.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.line_3d(Vec3::new(x1, y1, 0.0), Vec3::new(x2, y2, 0.0));
    }

    pub fn line_3d(&mut self, a: Vec3, b: Vec3) {
        let Some(color) = self.state.active_stroke() else { return };
        let m = *self.transform.current();
        self.geometry.add_stroke(
            &m,
            &[StrokeVertex::new(a, color), StrokeVertex::new(b, color)],
        );
    }

    /// Rectangle: filled with the dummy texture and/or outlined, per state.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.emit_quad(Rect::new(x, y, w, h).corners().map(|c| c.extend(0.0)));
    }

    pub fn triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        let points = [
            Vec3::new(x1, y1, 0.0),
            Vec3::new(x2, y2, 0.0),
            Vec3::new(x3, y3, 0.0),
        ];
        self.emit_polygon(&points, true);
    }

    /// Quadrilateral through four corners, filled as `(0, 1, 2), (2, 3, 0)`.
    pub fn quad(&mut self, corners: [Vec2; 4]) {
        self.emit_quad(corners.map(|c| c.extend(0.0)));
    }

    /// Simple polygon, convex or concave, with a closed outline.
    pub fn polygon(&mut self, points: &[Vec2]) {
        let mut pts = std::mem::take(&mut self.scratch_points);
        pts.clear();
        pts.extend(points.iter().map(|p| p.extend(0.0)));
        self.emit_polygon(&pts, true);
        self.scratch_points = pts;
    }

    /// Ellipse centered at `(cx, cy)` with diameters `w` × `h`.
    pub fn ellipse(&mut self, cx: f32, cy: f32, w: f32, h: f32) {
        let mut pts = std::mem::take(&mut self.scratch_points);
        pts.clear();
        shape::ellipse_points(
            &mut pts,
            Vec2::new(cx, cy),
            Vec2::new(w, h),
            self.config.ellipse_segments,
        );
        self.emit_polygon(&pts, true);
        self.scratch_points = pts;
    }

    /// Draws `img` at its native size.
    pub fn image(&mut self, img: &impl Image, x: f32, y: f32) {
        self.image_sized(img, x, y, NATIVE_SIZE, NATIVE_SIZE);
    }

    /// Draws `img` into `w` × `h`; either dimension may be [`NATIVE_SIZE`].
    ///
    /// Images are always filled, whatever the fill/stroke state, with UVs
    /// spanning `[0, 1]²` and the current tint as vertex color.
    pub fn image_sized(&mut self, img: &impl Image, x: f32, y: f32, w: f32, h: f32) {
        let w = resolve_size(w, img.width());
        let h = resolve_size(h, img.height());
        let corners = Rect::new(x, y, w, h).corners().map(|c| c.extend(0.0));

        let mut fill = std::mem::take(&mut self.scratch_fill);
        fill.clear();
        shape::fill_quad(&mut fill, corners, self.state.tint);
        let m = *self.transform.current();
        self.geometry.add_fill(&m, img.texture_id(), &fill);
        self.scratch_fill = fill;
    }

    /// Appends caller-tessellated triangles bound to `texture`.
    ///
    /// Positions are transformed by the current matrix; colors and UVs are
    /// used as given. A trailing partial triangle is dropped.
    pub fn fill_vertices(&mut self, texture: TextureId, vertices: &[FillVertex]) {
        let whole = vertices.len() - vertices.len() % 3;
        if whole != vertices.len() {
            log::warn!(
                "Renderer: fill_vertices got {} vertices; dropping {} trailing",
                vertices.len(),
                vertices.len() - whole
            );
        }
        let m = *self.transform.current();
        self.geometry.add_fill(&m, texture, &vertices[..whole]);
    }

    // ── shape builder ─────────────────────────────────────────────────────

    /// Starts recording vertices for a shape of `kind`.
    ///
    /// An unfinished shape is discarded.
    pub fn begin_shape(&mut self, kind: ShapeKind) {
        if self.shape_open {
            log::debug!("Renderer: begin_shape discards an unfinished shape");
        }
        self.shape.begin(kind);
        self.shape_open = true;
    }

    pub fn vertex(&mut self, x: f32, y: f32) {
        self.vertex_3d(x, y, 0.0);
    }

    pub fn vertex_3d(&mut self, x: f32, y: f32, z: f32) {
        if !self.shape_open {
            log::debug!("Renderer: vertex() outside begin_shape/end_shape ignored");
            return;
        }
        self.shape.points.push(Vec3::new(x, y, z));
    }

    /// Emits the recorded shape. `close` adds the closing edge to a polygon outline.
    pub fn end_shape(&mut self, close: bool) {
        if !self.shape_open {
            log::debug!("Renderer: end_shape() without begin_shape ignored");
            return;
        }
        self.shape_open = false;

        let mut builder = std::mem::take(&mut self.shape);
        let m = *self.transform.current();

        match builder.kind {
            ShapeKind::Polygon => self.emit_polygon(&builder.points, close),
            ShapeKind::Triangles => {
                if let Some(color) = self.state.active_fill() {
                    let mut fill = std::mem::take(&mut self.scratch_fill);
                    fill.clear();
                    shape::fill_triangles(&mut fill, &builder.points, color);
                    self.geometry.add_fill(&m, self.dummy_texture, &fill);
                    self.scratch_fill = fill;
                }
                if let Some(color) = self.state.active_stroke() {
                    let mut stroke = std::mem::take(&mut self.scratch_stroke);
                    stroke.clear();
                    for tri in builder.points.chunks_exact(3) {
                        shape::outline(&mut stroke, tri, true, color);
                    }
                    self.geometry.add_stroke(&m, &stroke);
                    self.scratch_stroke = stroke;
                }
            }
            ShapeKind::Lines => {
                if let Some(color) = self.state.active_stroke() {
                    let mut stroke = std::mem::take(&mut self.scratch_stroke);
                    stroke.clear();
                    shape::segments(&mut stroke, &builder.points, color);
                    self.geometry.add_stroke(&m, &stroke);
                    self.scratch_stroke = stroke;
                }
            }
        }

        builder.points.clear();
        self.shape = builder;
    }

    /// Fills (dummy texture) and/or outlines `points` per the current state.
    fn emit_polygon(&mut self, points: &[Vec3], closed: bool) {
        self.emit_outlined(points, closed, shape::fill_polygon);
    }

    fn emit_quad(&mut self, corners: [Vec3; 4]) {
        self.emit_outlined(&corners, true, |out, _, color| {
            shape::fill_quad(out, corners, color)
        });
    }

    /// Outlines `points` and fills them with `interior`, per the active state.
    fn emit_outlined(
        &mut self,
        points: &[Vec3],
        closed: bool,
        interior: impl FnOnce(&mut Vec<FillVertex>, &[Vec3], Color),
    ) {
        let m = *self.transform.current();

        if let Some(color) = self.state.active_stroke() {
            let mut stroke = std::mem::take(&mut self.scratch_stroke);
            stroke.clear();
            shape::outline(&mut stroke, points, closed, color);
            self.geometry.add_stroke(&m, &stroke);
            self.scratch_stroke = stroke;
        }

        if let Some(color) = self.state.active_fill() {
            let mut fill = std::mem::take(&mut self.scratch_fill);
            fill.clear();
            interior(&mut fill, points, color);
            self.geometry.add_fill(&m, self.dummy_texture, &fill);
            self.scratch_fill = fill;
        }
    }

    // ── flush ─────────────────────────────────────────────────────────────

    fn uniforms(&self) -> MatrixUniforms {
        MatrixUniforms::new(self.projection, self.view)
    }

    /// Uploads and draws the fill lane, one draw per batch, then clears it.
    pub fn flush_fill(&mut self) -> FlushStats {
        let uniforms = self.uniforms();
        flush::flush_fill(&mut self.device, &mut self.geometry, &uniforms)
    }

    /// Uploads and draws the stroke lane in one draw, then clears it.
    pub fn flush_stroke(&mut self) -> FlushStats {
        let uniforms = self.uniforms();
        flush::flush_stroke(&mut self.device, &mut self.geometry, &uniforms)
    }

    /// Flushes fill, then stroke, so outlines land on top of fills.
    ///
    /// The transform stack and color state are left as they are.
    pub fn flush(&mut self) -> FrameStats {
        let fill = self.flush_fill();
        let stroke = self.flush_stroke();

        let growth = self.geometry.growth_events();
        let stats = FrameStats {
            fill,
            stroke,
            growth_events: growth.wrapping_sub(self.growth_seen),
        };
        self.growth_seen = growth;

        log::trace!(
            "flush: {} fill vertices in {} batches, {} stroke vertices, {} draw calls, {} growth events",
            stats.fill.vertices,
            stats.fill.batches,
            stats.stroke.vertices,
            stats.draw_calls(),
            stats.growth_events
        );
        stats
    }
}

impl<D: GraphicsDevice> Drop for Renderer<D> {
    fn drop(&mut self) {
        self.device.release_texture(self.dummy_texture);
    }
}
