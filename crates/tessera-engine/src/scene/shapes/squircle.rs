use crate::coords::Vec2;

use super::Point;

/// Superellipse `|x/a|^e + |y/b|^e = 1` with `a = w/2`, `b = h/2`.
///
/// - `exponent == 2` is an ellipse
/// - large exponents approach the bounding rectangle
/// - `0 < exponent < 1` gives a concave four-pointed star
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Squircle {
    pub center: Point,
    pub dimensions: Vec2,
    pub rotation: f32,
    pub exponent: f32,
}

impl Squircle {
    #[inline]
    pub const fn new(center: Point, dimensions: Vec2, exponent: f32) -> Self {
        Self { center, dimensions, rotation: 0.0, exponent }
    }

    #[inline]
    pub const fn rotated(self, rotation: f32) -> Self {
        Self { rotation, ..self }
    }
}
