use std::collections::{HashMap, HashSet};
use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::render::device::{GraphicsDevice, LaneKind, MatrixUniforms, ShaderProgram, Topology};
use crate::render::texture::TextureId;
use crate::render::{RenderCtx, RenderTarget};

use super::image::GpuImage;
use super::pipeline::{self, Programs};

/// Smallest lane vertex buffer allocation, in bytes.
const MIN_LANE_BUFFER_BYTES: u64 = 64 * 1024;

/// Device-side resources of one lane.
struct LaneBuffers {
    vbo: Option<wgpu::Buffer>,
    vbo_size: u64,
    ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct GpuTexture {
    // Kept alive for the bind group.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Commands recorded between flushes and replayed by [`WgpuDevice::encode`].
enum Op {
    Upload {
        lane: LaneKind,
        staging: wgpu::Buffer,
        dst: wgpu::Buffer,
        size: u64,
    },
    Matrices {
        staging: wgpu::Buffer,
        dst: wgpu::Buffer,
    },
    UseProgram {
        program: ShaderProgram,
        vbo: wgpu::Buffer,
        size: u64,
        bind_group: wgpu::BindGroup,
    },
    BindTexture(TextureId),
    Draw(Range<u32>),
}

/// wgpu implementation of [`GraphicsDevice`].
///
/// Flush calls are recorded, not executed: uploads become staging buffers and
/// draws become pending ops. [`encode`](Self::encode) replays them into the
/// frame's command encoder, copies first and then one render pass per lane
/// flush, so several flushes of the same lane in one frame stay ordered.
///
/// Lane vertex buffers grow to the next power of two and are never shrunk.
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,

    matrices_bgl: wgpu::BindGroupLayout,
    texture_bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    programs: Option<Programs>,

    fill: LaneBuffers,
    stroke: LaneBuffers,
    current_lane: Option<LaneKind>,

    textures: HashMap<TextureId, GpuTexture>,
    next_texture: u64,
    warned_missing: HashSet<TextureId>,

    pending: Vec<Op>,
}

impl WgpuDevice {
    /// Creates the device-side resources for rendering into `ctx.surface_format`.
    ///
    /// Programs are built later, by `prepare_programs`, when the renderer is
    /// constructed.
    pub fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device.clone();
        let matrices_bgl = pipeline::matrices_bgl(&device);
        let texture_bgl = pipeline::texture_bgl(&device);
        let sampler = pipeline::linear_sampler(&device);
        let fill = Self::lane_buffers(&device, &matrices_bgl, "quill fill");
        let stroke = Self::lane_buffers(&device, &matrices_bgl, "quill stroke");

        Self {
            device,
            queue: ctx.queue.clone(),
            surface_format: ctx.surface_format,
            matrices_bgl,
            texture_bgl,
            sampler,
            programs: None,
            fill,
            stroke,
            current_lane: None,
            textures: HashMap::new(),
            next_texture: 0,
            warned_missing: HashSet::new(),
            pending: Vec::new(),
        }
    }

    /// Uploads RGBA8 pixels as a drawable image.
    pub fn create_image(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<GpuImage, RenderError> {
        let id = self.create_texture_rgba8(width, height, pixels)?;
        Ok(GpuImage::new(id, width, height))
    }

    /// Replays recorded flushes into `target` and clears the record.
    ///
    /// Each render pass loads the existing target content.
    pub fn encode(&mut self, target: &mut RenderTarget<'_>) {
        let ops = std::mem::take(&mut self.pending);
        let Some(programs) = self.programs.as_ref() else {
            if !ops.is_empty() {
                log::warn!("WgpuDevice: encode() before programs were prepared; dropping frame");
            }
            return;
        };

        for group in split_flushes(&ops, |op| matches!(op, Op::Upload { .. })) {
            for op in group {
                match op {
                    Op::Upload { staging, dst, size, .. } => {
                        target.encoder.copy_buffer_to_buffer(staging, 0, dst, 0, *size);
                    }
                    Op::Matrices { staging, dst } => {
                        target.encoder.copy_buffer_to_buffer(
                            staging,
                            0,
                            dst,
                            0,
                            std::mem::size_of::<MatrixUniforms>() as u64,
                        );
                    }
                    _ => {}
                }
            }

            let label = match group.first() {
                Some(Op::Upload { lane: LaneKind::Fill, .. }) => "quill fill pass",
                _ => "quill stroke pass",
            };

            let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let mut gate = DrawGate::new();
            for op in group {
                match op {
                    Op::UseProgram { program, vbo, size, bind_group } => {
                        rpass.set_pipeline(programs.get(*program));
                        rpass.set_vertex_buffer(0, vbo.slice(0..*size));
                        rpass.set_bind_group(0, bind_group, &[]);
                    }
                    Op::BindTexture(id) => {
                        let tex = self.textures.get(id);
                        if let Some(tex) = tex {
                            rpass.set_bind_group(1, &tex.bind_group, &[]);
                        }
                        gate.bind(*id, tex.is_some(), &mut self.warned_missing);
                    }
                    Op::Draw(range) => {
                        if gate.allows_draw() {
                            rpass.draw(range.clone(), 0..1);
                        }
                    }
                    Op::Upload { .. } | Op::Matrices { .. } => {}
                }
            }
        }
    }

    // ── helpers ────────────────────────────────────────────────────────────

    fn lane_buffers(
        device: &wgpu::Device,
        matrices_bgl: &wgpu::BindGroupLayout,
        label: &'static str,
    ) -> LaneBuffers {
        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<MatrixUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: matrices_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });
        LaneBuffers {
            vbo: None,
            vbo_size: 0,
            ubo,
            bind_group,
        }
    }

    fn lane(&self, lane: LaneKind) -> &LaneBuffers {
        match lane {
            LaneKind::Fill => &self.fill,
            LaneKind::Stroke => &self.stroke,
        }
    }

    /// Ensures the lane's vertex buffer holds at least `required` bytes.
    ///
    /// A replaced buffer stays alive while recorded ops still reference it.
    fn ensure_lane_capacity(&mut self, lane: LaneKind, required: u64) -> wgpu::Buffer {
        let device = &self.device;
        let buffers = match lane {
            LaneKind::Fill => &mut self.fill,
            LaneKind::Stroke => &mut self.stroke,
        };

        if let Some(vbo) = buffers.vbo.as_ref() {
            if required <= buffers.vbo_size {
                return vbo.clone();
            }
        }

        let new_size = required.next_power_of_two().max(MIN_LANE_BUFFER_BYTES);
        log::debug!(
            "WgpuDevice: {lane:?} vertex buffer {} -> {} bytes",
            buffers.vbo_size,
            new_size
        );
        let vbo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(match lane {
                LaneKind::Fill => "quill fill vbo",
                LaneKind::Stroke => "quill stroke vbo",
            }),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        buffers.vbo = Some(vbo.clone());
        buffers.vbo_size = new_size;
        vbo
    }
}

/// Splits recorded ops into one slice per lane flush.
///
/// A flush starts at every op for which `starts_flush` holds; ops before the
/// first such op form their own leading slice.
fn split_flushes<T>(ops: &[T], starts_flush: impl Fn(&T) -> bool) -> Vec<&[T]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for (i, op) in ops.iter().enumerate() {
        if i > start && starts_flush(op) {
            groups.push(&ops[start..i]);
            start = i;
        }
    }
    if start < ops.len() {
        groups.push(&ops[start..]);
    }
    groups
}

/// Whether draws may run after the latest texture bind.
///
/// An unknown texture closes the gate until the next known bind. Each unknown
/// id is reported once per device.
#[derive(Debug)]
struct DrawGate {
    open: bool,
}

impl DrawGate {
    fn new() -> Self {
        Self { open: true }
    }

    fn bind(&mut self, id: TextureId, known: bool, warned: &mut HashSet<TextureId>) {
        self.open = known;
        if !known && warned.insert(id) {
            log::warn!("WgpuDevice: unknown texture {id:?}; its batches are skipped");
        }
    }

    #[inline]
    fn allows_draw(&self) -> bool {
        self.open
    }
}

impl GraphicsDevice for WgpuDevice {
    fn prepare_programs(&mut self) -> Result<(), RenderError> {
        let programs = pipeline::build_programs(
            &self.device,
            self.surface_format,
            &self.matrices_bgl,
            &self.texture_bgl,
        )?;
        self.programs = Some(programs);
        Ok(())
    }

    fn create_texture_rgba8(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureId, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::Texture(format!("zero-sized texture {width}x{height}")));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::Texture(format!(
                "expected {expected} bytes for {width}x{height} RGBA8, got {}",
                pixels.len()
            )));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quill texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quill texture bind group"),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.textures.insert(
            id,
            GpuTexture {
                _texture: texture,
                bind_group,
            },
        );
        Ok(id)
    }

    fn release_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_none() {
            log::debug!("WgpuDevice: release of unknown texture {id:?}");
        }
    }

    fn upload(&mut self, lane: LaneKind, bytes: &[u8]) {
        let size = bytes.len() as u64;
        let dst = self.ensure_lane_capacity(lane, size);
        let staging = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quill lane staging"),
            contents: bytes,
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        self.current_lane = Some(lane);
        self.pending.push(Op::Upload {
            lane,
            staging,
            dst,
            size,
        });
    }

    fn use_program(&mut self, program: ShaderProgram) {
        let Some(lane) = self.current_lane else {
            log::warn!("WgpuDevice: use_program({program:?}) before any upload ignored");
            return;
        };
        let buffers = self.lane(lane);
        let (Some(vbo), size) = (buffers.vbo.clone(), buffers.vbo_size) else {
            return;
        };
        let bind_group = buffers.bind_group.clone();
        self.pending.push(Op::UseProgram {
            program,
            vbo,
            size,
            bind_group,
        });
    }

    fn set_matrices(&mut self, uniforms: &MatrixUniforms) {
        let Some(lane) = self.current_lane else { return };
        let staging = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quill matrices staging"),
            contents: bytemuck::bytes_of(uniforms),
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        let dst = self.lane(lane).ubo.clone();
        self.pending.push(Op::Matrices { staging, dst });
    }

    fn bind_texture(&mut self, id: TextureId) {
        self.pending.push(Op::BindTexture(id));
    }

    fn draw(&mut self, topology: Topology, vertices: Range<u32>) {
        debug_assert_eq!(
            Some(topology),
            self.current_lane.map(LaneKind::topology),
            "draw topology does not match the uploaded lane"
        );
        self.pending.push(Op::Draw(vertices));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Rec {
        Upload(u8),
        Other,
    }

    fn is_upload(r: &Rec) -> bool {
        matches!(r, Rec::Upload(_))
    }

    // ── flush grouping ────────────────────────────────────────────────────

    #[test]
    fn every_upload_starts_a_flush() {
        let ops = [
            Rec::Upload(0),
            Rec::Other,
            Rec::Other,
            Rec::Upload(1),
            Rec::Other,
            Rec::Upload(2),
        ];
        let groups = split_flushes(&ops, is_upload);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1], &[Rec::Upload(1), Rec::Other][..]);
        assert_eq!(groups[2], &[Rec::Upload(2)][..]);
    }

    #[test]
    fn ops_before_first_upload_form_their_own_group() {
        let ops = [Rec::Other, Rec::Upload(0), Rec::Other];
        let groups = split_flushes(&ops, is_upload);
        assert_eq!(groups, vec![&[Rec::Other][..], &[Rec::Upload(0), Rec::Other][..]]);
    }

    #[test]
    fn no_ops_no_groups() {
        let ops: [Rec; 0] = [];
        assert!(split_flushes(&ops, is_upload).is_empty());
    }

    // ── unknown textures ──────────────────────────────────────────────────

    #[test]
    fn unknown_texture_blocks_draws_until_known_bind() {
        let mut warned = HashSet::new();
        let mut gate = DrawGate::new();
        assert!(gate.allows_draw());

        gate.bind(TextureId(9), false, &mut warned);
        assert!(!gate.allows_draw());

        gate.bind(TextureId(1), true, &mut warned);
        assert!(gate.allows_draw());
    }

    #[test_log::test]
    fn unknown_texture_is_reported_once() {
        let mut warned = HashSet::new();
        let mut gate = DrawGate::new();
        gate.bind(TextureId(9), false, &mut warned);
        gate.bind(TextureId(9), false, &mut warned);
        gate.bind(TextureId(1), true, &mut warned);
        assert_eq!(warned.len(), 1);
        assert!(warned.contains(&TextureId(9)));
    }
}
