//! wgpu side of sprite rendering.
//!
//! `SpriteBatch` decides what gets drawn and when; this module owns the GPU
//! resources that carry it out (pipeline, streaming vertex buffer, textures).
//!
//! Convention:
//! - vertex positions are logical pixels of the reference resolution (top-left origin, +Y down)
//! - the vertex shader maps them to NDC with a projection uniform

mod common;
mod ctx;
mod sprite_backend;
mod texture;

pub use ctx::RenderCtx;
pub use sprite_backend::{GpuFence, WgpuSpriteBatch, WgpuStreamBackend};
pub use texture::SheetTexture;
