//! Contract between the runtime loop and the game.
//!
//! The runtime owns the window, GPU and clock; the game sees them only through
//! `FrameCtx` once per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
