use super::Point;

/// Filled circle. A radius `<= 0` is valid and renders nothing.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub const fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }
}
