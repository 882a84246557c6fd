//! Object descriptor types.
//!
//! Responsibilities:
//! - the closed set of primitive kinds an object buffer can hold
//! - renderer-agnostic shape records supplied by callers per object
//! - keep shape-specific records isolated per file under `scene::shapes`

mod kind;
mod shape;

pub mod shapes;

pub use kind::PrimitiveKind;
pub use shape::Shape;
