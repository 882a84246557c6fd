use crate::coords::Vec2;

use super::Point;

/// Rectangle centered on `center.position`, rotated by `rotation` radians.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub center: Point,
    pub dimensions: Vec2,
    pub rotation: f32,
}

impl Rect {
    #[inline]
    pub const fn new(center: Point, dimensions: Vec2) -> Self {
        Self { center, dimensions, rotation: 0.0 }
    }

    #[inline]
    pub const fn rotated(self, rotation: f32) -> Self {
        Self { rotation, ..self }
    }
}
