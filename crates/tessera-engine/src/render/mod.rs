//! GPU rendering: object buffers and the textures they sample.
//!
//! Each object buffer owns its GPU resources (vertex/index buffers, pipeline,
//! bind group) and creates pipeline state lazily on first render.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.
//! - Colors are straight alpha; shaders premultiply before blending.

mod ctx;
mod object_buffer;
mod pipeline;
mod store;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use object_buffer::ObjectBuffer;
pub use store::{DrawRange, ObjectStore};
pub use texture::{Filter, Texture, TextureDesc, TextureFormat, Wrap, validate as validate_texture};
