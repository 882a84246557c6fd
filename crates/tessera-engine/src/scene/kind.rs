/// Primitive type held by an object buffer. Fixed for the buffer's lifetime.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Point,
    Line,
    Triangle,
    Rect,
    RoundRect,
    Circle,
    Squircle,
    Texture2D,
    Texture2DArray,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Point,
        PrimitiveKind::Line,
        PrimitiveKind::Triangle,
        PrimitiveKind::Rect,
        PrimitiveKind::RoundRect,
        PrimitiveKind::Circle,
        PrimitiveKind::Squircle,
        PrimitiveKind::Texture2D,
        PrimitiveKind::Texture2DArray,
    ];

    /// True for kinds that sample a bound texture.
    #[inline]
    pub const fn is_textured(self) -> bool {
        matches!(self, PrimitiveKind::Texture2D | PrimitiveKind::Texture2DArray)
    }

    /// Short lowercase name used in GPU resource labels.
    pub const fn label(self) -> &'static str {
        match self {
            PrimitiveKind::Point => "point",
            PrimitiveKind::Line => "line",
            PrimitiveKind::Triangle => "triangle",
            PrimitiveKind::Rect => "rect",
            PrimitiveKind::RoundRect => "round_rect",
            PrimitiveKind::Circle => "circle",
            PrimitiveKind::Squircle => "squircle",
            PrimitiveKind::Texture2D => "texture_2d",
            PrimitiveKind::Texture2DArray => "texture_2d_array",
        }
    }
}
