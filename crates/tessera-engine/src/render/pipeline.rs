//! Shared GPU pieces used by object buffers: blend state, viewport uniform,
//! bind group layouts and pipeline construction.

use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;
use crate::scene::PrimitiveKind;
use crate::tessellate::{ColorVertex, Primitive, TexVertex};

use super::RenderCtx;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ViewportUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            viewport: viewport.uniform_size(),
            _pad: [0.0; 2],
        }
    }
}

// ── shader families ───────────────────────────────────────────────────────

/// Which built-in shader a primitive kind is drawn with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(super) enum ShaderFamily {
    Color,
    Texture,
    TextureArray,
}

impl ShaderFamily {
    pub(super) fn of(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Texture2D => ShaderFamily::Texture,
            PrimitiveKind::Texture2DArray => ShaderFamily::TextureArray,
            _ => ShaderFamily::Color,
        }
    }

    fn source(self) -> &'static str {
        match self {
            ShaderFamily::Color => include_str!("shaders/shape.wgsl"),
            ShaderFamily::Texture => include_str!("shaders/texture.wgsl"),
            ShaderFamily::TextureArray => include_str!("shaders/texture_array.wgsl"),
        }
    }

    fn vertex_layout(self) -> wgpu::VertexBufferLayout<'static> {
        match self {
            ShaderFamily::Color => ColorVertex::layout(),
            ShaderFamily::Texture | ShaderFamily::TextureArray => TexVertex::layout(),
        }
    }

    pub(super) fn view_dimension(self) -> Option<wgpu::TextureViewDimension> {
        match self {
            ShaderFamily::Color => None,
            ShaderFamily::Texture => Some(wgpu::TextureViewDimension::D2),
            ShaderFamily::TextureArray => Some(wgpu::TextureViewDimension::D2Array),
        }
    }
}

// ── bind group layout ─────────────────────────────────────────────────────

/// Binding 0: viewport uniform. Textured families add 1: texture, 2: sampler.
pub(super) fn bind_group_layout(
    device: &wgpu::Device,
    family: ShaderFamily,
    filterable: bool,
) -> wgpu::BindGroupLayout {
    let mut entries = vec![wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ViewportUniform>() as u64),
        },
        count: None,
    }];

    if let Some(view_dimension) = family.view_dimension() {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable },
                view_dimension,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(if filterable {
                wgpu::SamplerBindingType::Filtering
            } else {
                wgpu::SamplerBindingType::NonFiltering
            }),
            count: None,
        });
    }

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("tessera object bgl"),
        entries: &entries,
    })
}

// ── pipeline ──────────────────────────────────────────────────────────────

pub(super) fn create_pipeline(
    ctx: &RenderCtx<'_>,
    family: ShaderFamily,
    primitive: Primitive,
    bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("tessera object shader"),
        source: wgpu::ShaderSource::Wgsl(family.source().into()),
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("tessera object pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("tessera object pipeline"),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[family.vertex_layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(premul_alpha_blend()),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: primitive.to_wgpu(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Rotation and negative extents flip winding.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_uniform_is_16_bytes() {
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
    }

    #[test]
    fn viewport_uniform_never_divides_by_zero() {
        let u = ViewportUniform::new(Viewport::new(0.0, 0.0));
        assert_eq!(u.viewport, [1.0, 1.0]);
    }

    #[test]
    fn families_follow_kind() {
        assert_eq!(ShaderFamily::of(PrimitiveKind::Squircle), ShaderFamily::Color);
        assert_eq!(ShaderFamily::of(PrimitiveKind::Texture2D), ShaderFamily::Texture);
        assert_eq!(
            ShaderFamily::of(PrimitiveKind::Texture2DArray).view_dimension(),
            Some(wgpu::TextureViewDimension::D2Array)
        );
    }
}
