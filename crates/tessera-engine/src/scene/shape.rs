use super::PrimitiveKind;
use super::shapes::{
    ArrayTexturedRect, Circle, Line, Point, Rect, RoundRect, Squircle, Triangle, TexturedRect,
};

/// One object descriptor. Closed set; one variant per [`PrimitiveKind`].
///
/// Extending:
/// - add a record under `scene::shapes::*`
/// - add a variant here and in `PrimitiveKind`
/// - add its topology and tessellation routine under `tessellate::*`
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    Line(Line),
    Triangle(Triangle),
    Rect(Rect),
    RoundRect(RoundRect),
    Circle(Circle),
    Squircle(Squircle),
    Texture2D(TexturedRect),
    Texture2DArray(ArrayTexturedRect),
}

impl Shape {
    #[inline]
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Shape::Point(_) => PrimitiveKind::Point,
            Shape::Line(_) => PrimitiveKind::Line,
            Shape::Triangle(_) => PrimitiveKind::Triangle,
            Shape::Rect(_) => PrimitiveKind::Rect,
            Shape::RoundRect(_) => PrimitiveKind::RoundRect,
            Shape::Circle(_) => PrimitiveKind::Circle,
            Shape::Squircle(_) => PrimitiveKind::Squircle,
            Shape::Texture2D(_) => PrimitiveKind::Texture2D,
            Shape::Texture2DArray(_) => PrimitiveKind::Texture2DArray,
        }
    }
}

macro_rules! impl_from_shape {
    ($($record:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$record> for Shape {
                #[inline]
                fn from(v: $record) -> Self {
                    Shape::$variant(v)
                }
            }
        )*
    };
}

impl_from_shape! {
    Point => Point,
    Line => Line,
    Triangle => Triangle,
    Rect => Rect,
    RoundRect => RoundRect,
    Circle => Circle,
    Squircle => Squircle,
    TexturedRect => Texture2D,
    ArrayTexturedRect => Texture2DArray,
}
