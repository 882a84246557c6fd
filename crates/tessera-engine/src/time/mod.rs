//! Time subsystem.
//!
//! - one `FrameClock` per window; `tick()` once per presented frame
//! - `Timer` for wall-clock animation time, `FixedTimer` for deterministic steps

mod frame_clock;
mod timer;

pub use frame_clock::{FrameClock, FrameTime};
pub use timer::{FixedTimer, Timer};
