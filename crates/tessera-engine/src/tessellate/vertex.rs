use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Vec3};

/// Flat-colored vertex (28 bytes):
///
///  offset  0  position [f32; 3]   loc 0
///  offset 12  color    [f32; 4]   loc 1  (straight alpha)
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    #[inline]
    pub fn new(position: Vec3, color: ColorRgba) -> Self {
        Self { position: position.to_array(), color: color.to_array() }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Textured vertex (40 bytes):
///
///  offset  0  position [f32; 3]   loc 0
///  offset 12  color    [f32; 4]   loc 1  (tint, straight alpha)
///  offset 28  uv       [f32; 3]   loc 2  (.z = array layer, 0 for plain 2D)
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TexVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 3],
}

impl TexVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4, // color
        2 => Float32x3  // uv + layer
    ];

    #[inline]
    pub fn new(position: Vec3, color: ColorRgba, uv: [f32; 3]) -> Self {
        Self { position: position.to_array(), color: color.to_array(), uv }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
