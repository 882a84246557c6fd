use super::Vec2;

/// 3D position. `x`/`y` are logical pixels; `z` is carried through to the
/// vertex stream unchanged.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Offsets `x`/`y` by `d`, keeping `z`.
    #[inline]
    pub fn offset(self, d: Vec2) -> Self {
        Self::new(self.x + d.x, self.y + d.y, self.z)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<Vec2> for Vec3 {
    #[inline]
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y, 0.0)
    }
}
