//! Per-shape descriptor records. One file per shape family.

mod circle;
mod point;
mod rect;
mod rounded_rect;
mod squircle;
mod textured;

pub use circle::Circle;
pub use point::{Line, Point, Triangle};
pub use rect::Rect;
pub use rounded_rect::RoundRect;
pub use squircle::Squircle;
pub use textured::{ArrayTexturedRect, TexturedRect};
