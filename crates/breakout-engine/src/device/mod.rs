//! GPU device and window surface.
//!
//! Creates the wgpu instance/adapter/device/queue, keeps the surface configured,
//! and hands out one frame at a time.

mod gpu;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
