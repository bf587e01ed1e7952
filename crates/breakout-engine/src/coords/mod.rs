//! Coordinate and colour types shared by the renderer and the game.
//!
//! Two spaces are in play:
//! - world space, in metres, used by game logic and sprite submission
//! - logical pixel space (top-left origin, +Y down) of the reference resolution
//!
//! `SpriteBatch` converts the former into the latter with `pixels_per_metre`.

mod color;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use vec2::Vec2;
pub use viewport::Viewport;
