use crate::coords::Vec2;

use super::Point;

/// Rectangle whose four corners are circular arcs of `corner_radius`.
///
/// The radius is clamped to `[0, min(w, h) / 2]` during tessellation, so any
/// value is accepted here.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RoundRect {
    pub center: Point,
    pub dimensions: Vec2,
    pub rotation: f32,
    pub corner_radius: f32,
}

impl RoundRect {
    #[inline]
    pub const fn new(center: Point, dimensions: Vec2, corner_radius: f32) -> Self {
        Self { center, dimensions, rotation: 0.0, corner_radius }
    }

    #[inline]
    pub const fn rotated(self, rotation: f32) -> Self {
        Self { rotation, ..self }
    }

    /// Corner radius after clamping against the current dimensions.
    #[inline]
    pub fn effective_corner_radius(&self) -> f32 {
        let w = self.dimensions.x.max(0.0);
        let h = self.dimensions.y.max(0.0);
        let r = self.corner_radius;
        if r.is_nan() { 0.0 } else { r.clamp(0.0, w.min(h) * 0.5) }
    }
}
