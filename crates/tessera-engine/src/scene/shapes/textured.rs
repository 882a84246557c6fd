use crate::coords::{Vec2, Vec3};

use super::Point;

/// Quad sampling a 2D texture over `[origin, origin + extent]` in UV space.
///
/// `center.color` tints the sampled texels (white leaves them unchanged).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TexturedRect {
    pub center: Point,
    pub dimensions: Vec2,
    pub rotation: f32,
    pub texture_origin: Vec2,
    pub texture_extent: Vec2,
}

impl TexturedRect {
    /// Quad showing the whole texture.
    #[inline]
    pub const fn new(center: Point, dimensions: Vec2) -> Self {
        Self {
            center,
            dimensions,
            rotation: 0.0,
            texture_origin: Vec2::zero(),
            texture_extent: Vec2::splat(1.0),
        }
    }

    #[inline]
    pub const fn with_region(self, origin: Vec2, extent: Vec2) -> Self {
        Self { texture_origin: origin, texture_extent: extent, ..self }
    }

    #[inline]
    pub const fn rotated(self, rotation: f32) -> Self {
        Self { rotation, ..self }
    }
}

/// Quad sampling one layer of a 2D array texture.
///
/// `texture_origin.z` is the layer index, constant across the quad;
/// `texture_extent.z` is ignored.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArrayTexturedRect {
    pub center: Point,
    pub dimensions: Vec2,
    pub rotation: f32,
    pub texture_origin: Vec3,
    pub texture_extent: Vec3,
}

impl ArrayTexturedRect {
    /// Quad showing the whole of `layer`.
    #[inline]
    pub const fn new(center: Point, dimensions: Vec2, layer: u32) -> Self {
        Self {
            center,
            dimensions,
            rotation: 0.0,
            texture_origin: Vec3::new(0.0, 0.0, layer as f32),
            texture_extent: Vec3::new(1.0, 1.0, 0.0),
        }
    }

    #[inline]
    pub const fn with_layer(mut self, layer: u32) -> Self {
        self.texture_origin.z = layer as f32;
        self
    }

    #[inline]
    pub const fn rotated(self, rotation: f32) -> Self {
        Self { rotation, ..self }
    }
}
