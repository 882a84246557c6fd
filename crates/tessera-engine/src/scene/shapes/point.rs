use crate::coords::{ColorRgba, Vec3};

/// Colored position. Stands alone as a point primitive and serves as the
/// center record of every other shape.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub position: Vec3,
    pub color: ColorRgba,
}

impl Point {
    #[inline]
    pub const fn new(position: Vec3, color: ColorRgba) -> Self {
        Self { position, color }
    }

    /// Point on the `z = 0` plane.
    #[inline]
    pub const fn at(x: f32, y: f32, color: ColorRgba) -> Self {
        Self::new(Vec3::new(x, y, 0.0), color)
    }
}

/// Line segment between two independently colored points.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    #[inline]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Triangle with per-corner position and color.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Triangle {
    pub points: [Point; 3],
}

impl Triangle {
    #[inline]
    pub const fn new(a: Point, b: Point, c: Point) -> Self {
        Self { points: [a, b, c] }
    }
}
