use crate::error::RenderError;
use crate::render::device::{MatrixUniforms, ShaderProgram};
use crate::render::vertex::{FillVertex, StrokeVertex};

use super::shader::{self, FRAGMENT_ENTRY, VERTEX_ENTRY};

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha blending; vertex colors and texels are not premultiplied.
fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState::ALPHA_BLENDING
}

// ── bind group layouts ────────────────────────────────────────────────────

pub(super) fn matrices_bgl(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("quill matrices bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<MatrixUniforms>() as u64,
                ),
            },
            count: None,
        }],
    })
}

pub(super) fn texture_bgl(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("quill texture bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

pub(super) fn linear_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("quill texture sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

// ── pipelines ─────────────────────────────────────────────────────────────

/// Both compiled programs.
pub(super) struct Programs {
    pub simple: wgpu::RenderPipeline,
    pub textured: wgpu::RenderPipeline,
}

impl Programs {
    #[inline]
    pub fn get(&self, program: ShaderProgram) -> &wgpu::RenderPipeline {
        match program {
            ShaderProgram::Simple => &self.simple,
            ShaderProgram::Textured => &self.textured,
        }
    }
}

/// Validates and builds both programs for `format`.
pub(super) fn build_programs(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    matrices_bgl: &wgpu::BindGroupLayout,
    texture_bgl: &wgpu::BindGroupLayout,
) -> Result<Programs, RenderError> {
    let simple = build(
        device,
        format,
        ShaderProgram::Simple,
        &[matrices_bgl],
        StrokeVertex::layout(),
        wgpu::PrimitiveTopology::LineList,
    )?;
    let textured = build(
        device,
        format,
        ShaderProgram::Textured,
        &[matrices_bgl, texture_bgl],
        FillVertex::layout(),
        wgpu::PrimitiveTopology::TriangleList,
    )?;
    Ok(Programs { simple, textured })
}

fn build(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    program: ShaderProgram,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    vertex_layout: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
) -> Result<wgpu::RenderPipeline, RenderError> {
    let src = shader::source(program);
    shader::validate(program, src)?;

    let label = match program {
        ShaderProgram::Simple => "quill simple",
        ShaderProgram::Textured => "quill textured",
    };

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts,
        immediate_size: 0,
    });

    Ok(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &[vertex_layout],
        },

        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(straight_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Mirrored transforms flip winding; both faces must draw.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    }))
}
