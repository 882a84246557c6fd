use crate::scene::PrimitiveKind;

use super::Tessellation;
use super::vertex::{ColorVertex, TexVertex};

/// Primitive assembly used by a buffer's pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    PointList,
    LineList,
    TriangleList,
}

impl Primitive {
    #[inline]
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Primitive::PointList => wgpu::PrimitiveTopology::PointList,
            Primitive::LineList => wgpu::PrimitiveTopology::LineList,
            Primitive::TriangleList => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum IndexPattern {
    /// Vertices are drawn directly in order.
    Direct,
    /// Two triangles over corners TL, TR, BR, BL.
    Quad,
    /// Vertex 0 is the hub; `rim` vertices follow and close back on the first.
    Fan { rim: u32 },
}

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Fixed per-object layout of one primitive kind.
///
/// Every object of a buffer occupies exactly `vertices` vertex slots and
/// `indices` index slots, so object `i` lives at vertex `i * vertices` and
/// index `i * indices` regardless of its parameters.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Topology {
    pub primitive: Primitive,
    /// Vertices per object.
    pub vertices: u32,
    /// Indices per object; zero for direct (non-indexed) kinds.
    pub indices: u32,
    /// Bytes per vertex.
    pub stride: u64,
    pattern: IndexPattern,
}

impl Topology {
    pub fn of(kind: PrimitiveKind, quality: &Tessellation) -> Self {
        const COLOR: u64 = std::mem::size_of::<ColorVertex>() as u64;
        const TEX: u64 = std::mem::size_of::<TexVertex>() as u64;
        let quality = quality.clamped();

        match kind {
            PrimitiveKind::Point => Self::direct(Primitive::PointList, 1, COLOR),
            PrimitiveKind::Line => Self::direct(Primitive::LineList, 2, COLOR),
            PrimitiveKind::Triangle => Self::direct(Primitive::TriangleList, 3, COLOR),
            PrimitiveKind::Rect => Self::quad(COLOR),
            PrimitiveKind::Texture2D | PrimitiveKind::Texture2DArray => Self::quad(TEX),
            PrimitiveKind::Circle | PrimitiveKind::Squircle => Self::fan(quality.curve_segments),
            PrimitiveKind::RoundRect => Self::fan(4 * (quality.corner_segments + 1)),
        }
    }

    const fn direct(primitive: Primitive, vertices: u32, stride: u64) -> Self {
        Self { primitive, vertices, indices: 0, stride, pattern: IndexPattern::Direct }
    }

    const fn quad(stride: u64) -> Self {
        Self {
            primitive: Primitive::TriangleList,
            vertices: 4,
            indices: 6,
            stride,
            pattern: IndexPattern::Quad,
        }
    }

    const fn fan(rim: u32) -> Self {
        Self {
            primitive: Primitive::TriangleList,
            vertices: rim + 1,
            indices: rim * 3,
            stride: std::mem::size_of::<ColorVertex>() as u64,
            pattern: IndexPattern::Fan { rim },
        }
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indices > 0
    }

    /// Vertex bytes occupied by one object.
    #[inline]
    pub fn object_bytes(&self) -> u64 {
        self.vertices as u64 * self.stride
    }

    /// Appends the absolute indices of object `object` to `out`.
    pub fn write_indices(&self, object: u32, out: &mut Vec<u32>) {
        let base = object * self.vertices;
        match self.pattern {
            IndexPattern::Direct => {}
            IndexPattern::Quad => out.extend(QUAD_INDICES.iter().map(|i| base + i)),
            IndexPattern::Fan { rim } => {
                for k in 0..rim {
                    out.extend([base, base + 1 + k, base + 1 + (k + 1) % rim]);
                }
            }
        }
    }

    /// Absolute indices for objects `0..count`.
    pub fn indices_for(&self, count: u32) -> Vec<u32> {
        let mut out = Vec::with_capacity(count as usize * self.indices as usize);
        for object in 0..count {
            self.write_indices(object, &mut out);
        }
        out
    }
}
