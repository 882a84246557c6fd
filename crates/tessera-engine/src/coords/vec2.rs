use core::ops::{Add, Mul, Neg, Sub};

/// 2D vector in logical pixels (or normalized UV space for texture coordinates).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    #[inline]
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Rotates around the origin by `angle` radians.
    ///
    /// With +Y down, positive angles turn clockwise on screen.
    #[inline]
    pub fn rotated(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Component-wise multiplication.
    #[inline]
    pub fn scaled(self, by: Vec2) -> Self {
        Self::new(self.x * by.x, self.y * by.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rotated_quarter_turn_maps_x_to_y() {
        let v = Vec2::new(1.0, 0.0).rotated(core::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotated_preserves_length() {
        let v = Vec2::new(3.0, 4.0);
        assert_abs_diff_eq!(v.rotated(1.234).length(), 5.0, epsilon = 1e-5);
    }

    #[test]
    fn scaled_is_component_wise() {
        assert_eq!(Vec2::new(2.0, 3.0).scaled(Vec2::new(4.0, -1.0)), Vec2::new(8.0, -3.0));
    }
}
