//! Tessera engine crate.
//!
//! Typed geometry object buffers: shape descriptors are tessellated into
//! fixed-size slots of a GPU buffer that can be refilled and drawn by range.
//! The crate also carries the window/GPU/input/time host the demos run on.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod error;
pub mod scene;
pub mod tessellate;
pub mod render;

pub use error::{ContractViolation, Error, FormatError, Result};
