//! Sprite rendering engine for the breakout game.
//!
//! - `sprite`: batching of sprite quads into a fenced, triple-buffered stream
//! - `render`: the wgpu side of that stream (pipeline, buffer, textures)
//! - `atlas`: sprite sheet metadata and UV lookup
//! - `window`, `device`, `core`, `time`: the platform loop the game runs in

pub mod atlas;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod sprite;
pub mod time;
pub mod window;
