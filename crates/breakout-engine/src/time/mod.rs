//! Frame timing.
//!
//! One `FrameClock` per loop; call `tick()` once per presented frame and run the
//! simulation `steps` times with the fixed `dt`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, DEFAULT_FRAME_CLAMP, DEFAULT_STEP};
