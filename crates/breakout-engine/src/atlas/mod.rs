//! Texture atlas metadata.
//!
//! A sprite sheet is one image plus a JSON description of the named sub-rectangles
//! ("frames") packed into it. Lookups hand out dense integer ids in file order.

mod sprite_sheet;

pub use sprite_sheet::{
    ImageFormat, PixelBounds, SpriteFrameData, SpriteSheet, SpriteSheetMeta, DEFAULT_ASSET_DIR,
};
