/// Viewport size in logical pixels.
///
/// Shaders use it as the basis for converting logical positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Size safe to divide by: each axis at least one pixel.
    #[inline]
    pub fn uniform_size(self) -> [f32; 2] {
        if self.is_valid() {
            [self.width.max(1.0), self.height.max(1.0)]
        } else {
            [1.0, 1.0]
        }
    }
}
