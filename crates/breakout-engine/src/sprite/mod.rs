//! Batched sprite submission over a triple-buffered streaming vertex buffer.
//!
//! `SpriteBatch` turns sprite submissions into textured quads and streams them
//! through `REGION_COUNT` fenced regions of one buffer. The GPU side lives behind
//! `StreamBackend`; the wgpu implementation is in `crate::render`.

mod backend;
mod batch;
mod config;
mod region;
mod sync;
mod vertex;

#[cfg(test)]
mod testing;

pub use backend::StreamBackend;
pub use batch::{BatchStats, SpriteBatch};
pub use config::{RendererConfig, DEFAULT_SPRITES_PER_BATCH};
pub use region::{RegionRing, REGION_COUNT};
pub use sync::FenceState;
pub use vertex::{SpriteVertex, UvBounds, VERTICES_PER_QUAD};
