//! Coordinate and color types shared by the tessellator, object buffers and demos.
//!
//! Canonical CPU space:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! Shaders convert to NDC using a viewport uniform.

mod color;
mod vec2;
mod vec3;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use viewport::Viewport;
