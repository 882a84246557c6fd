//! GPU device and surface.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue, opting into optional
//!   features such as float32 filtering when the adapter has them
//! - configures the window surface and maps its errors to frame actions
//! - acquires frames for the runtime to render into

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
