use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::coords::Vec2;
use crate::sprite::UvBounds;

/// Directory sheet images are resolved against unless told otherwise.
pub const DEFAULT_ASSET_DIR: &str = "assets/data/sprites";

/// Pixel layout of a sheet image.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
pub enum ImageFormat {
    #[serde(rename = "RGBA8888")]
    Rgba8888,
}

/// Sheet-wide metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheetMeta {
    /// Image path, already joined onto the asset directory.
    pub image: PathBuf,
    /// Image size in pixels.
    pub dimensions: [u32; 2],
    pub format: ImageFormat,
}

/// Pixel rectangle of a frame; `max` is exclusive (`min + size`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PixelBounds {
    pub min: [i32; 2],
    pub max: [i32; 2],
}

/// One named frame of the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrameData {
    pub name: String,
    pub bounds: PixelBounds,
    /// Untrimmed source size in pixels.
    pub size: [i32; 2],
}

/// Parsed sprite sheet: metadata plus frames addressable by id or name.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    meta: SpriteSheetMeta,
    frames: Vec<SpriteFrameData>,
    ids: HashMap<String, usize>,
}

// ── wire format ──

#[derive(Deserialize)]
struct SheetFile {
    meta: MetaFile,
    frames: Vec<FrameFile>,
}

#[derive(Deserialize)]
struct MetaFile {
    image: String,
    size: Extent,
    format: ImageFormat,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameFile {
    filename: String,
    frame: RectFile,
    source_size: Extent,
}

#[derive(Deserialize)]
struct RectFile {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

#[derive(Deserialize)]
struct Extent {
    w: i32,
    h: i32,
}

// ── loading ──

impl SpriteSheet {
    /// Reads and parses the sheet description at `path`.
    pub fn load(path: impl AsRef<Path>, asset_dir: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read sprite sheet {}", path.display()))?;
        Self::from_json_str(&json, asset_dir)
            .with_context(|| format!("invalid sprite sheet {}", path.display()))
    }

    /// Parses a sheet description; `meta.image` is resolved against `asset_dir`.
    pub fn from_json_str(json: &str, asset_dir: impl AsRef<Path>) -> Result<Self> {
        let file: SheetFile = serde_json::from_str(json).context("malformed sprite sheet json")?;

        let MetaFile {
            image,
            size,
            format,
        } = file.meta;
        anyhow::ensure!(
            size.w > 0 && size.h > 0,
            "sprite sheet image {image} has non-positive size {}x{}",
            size.w,
            size.h
        );

        let meta = SpriteSheetMeta {
            image: asset_dir.as_ref().join(image),
            dimensions: [size.w as u32, size.h as u32],
            format,
        };

        let mut frames = Vec::with_capacity(file.frames.len());
        let mut ids = HashMap::with_capacity(file.frames.len());

        for (id, frame) in file.frames.into_iter().enumerate() {
            let RectFile { x, y, w, h } = frame.frame;
            let name = &frame.filename;
            anyhow::ensure!(
                x >= 0 && y >= 0 && w >= 0 && h >= 0,
                "frame {name} has invalid rectangle ({x}, {y}) {w}x{h}"
            );
            let (max_x, max_y) = x
                .checked_add(w)
                .zip(y.checked_add(h))
                .with_context(|| format!("frame {name} rectangle overflows"))?;
            anyhow::ensure!(
                max_x <= size.w && max_y <= size.h,
                "frame {name} extends to ({max_x}, {max_y}), past the {}x{} sheet",
                size.w,
                size.h
            );
            anyhow::ensure!(
                ids.insert(frame.filename.clone(), id).is_none(),
                "duplicate frame name {}",
                frame.filename
            );

            frames.push(SpriteFrameData {
                name: frame.filename,
                bounds: PixelBounds {
                    min: [x, y],
                    max: [max_x, max_y],
                },
                size: [frame.source_size.w, frame.source_size.h],
            });
        }

        log::debug!(
            "sprite sheet {}: {} frames",
            meta.image.display(),
            frames.len()
        );

        Ok(Self { meta, frames, ids })
    }
}

// ── lookup ──

impl SpriteSheet {
    #[inline]
    pub fn meta(&self) -> &SpriteSheetMeta {
        &self.meta
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Id of the frame called `name`.
    ///
    /// Panics if the sheet has no such frame; names come from authored data and a
    /// miss is a content bug. Use `try_id_from_name` for untrusted input.
    pub fn id_from_name(&self, name: &str) -> usize {
        match self.try_id_from_name(name) {
            Some(id) => id,
            None => panic!("sprite sheet has no frame named {name:?}"),
        }
    }

    #[inline]
    pub fn try_id_from_name(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Panics if `id` is out of range.
    pub fn frame_data(&self, id: usize) -> &SpriteFrameData {
        assert!(
            id < self.frames.len(),
            "sprite id {id} out of range for sheet of {} frames",
            self.frames.len()
        );
        &self.frames[id]
    }

    /// Normalised texture coordinates of frame `id`: pixel bounds over sheet size.
    pub fn uv_bounds(&self, id: usize) -> UvBounds {
        let PixelBounds { min, max } = self.frame_data(id).bounds;
        let [w, h] = self.meta.dimensions;
        let (w, h) = (w as f32, h as f32);
        UvBounds::new(
            Vec2::new(min[0] as f32 / w, min[1] as f32 / h),
            Vec2::new(max[0] as f32 / w, max[1] as f32 / h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "frames": [
            {
                "filename": "entity/paddleRed",
                "frame": { "x": 0, "y": 0, "w": 64, "h": 16 },
                "rotated": false,
                "trimmed": false,
                "sourceSize": { "w": 64, "h": 16 }
            },
            {
                "filename": "entity/ballGrey",
                "frame": { "x": 64, "y": 0, "w": 16, "h": 16 },
                "sourceSize": { "w": 16, "h": 16 }
            },
            {
                "filename": "entity/element_grey_rectangle",
                "frame": { "x": 0, "y": 16, "w": 32, "h": 16 },
                "sourceSize": { "w": 32, "h": 16 }
            }
        ],
        "meta": {
            "app": "texture packer",
            "image": "sheet.png",
            "format": "RGBA8888",
            "size": { "w": 128, "h": 64 },
            "scale": "1"
        }
    }"#;

    fn sheet() -> SpriteSheet {
        SpriteSheet::from_json_str(SHEET, DEFAULT_ASSET_DIR).unwrap()
    }

    #[test]
    fn parses_meta() {
        let s = sheet();
        assert_eq!(s.meta().image, Path::new("assets/data/sprites/sheet.png"));
        assert_eq!(s.meta().dimensions, [128, 64]);
        assert_eq!(s.meta().format, ImageFormat::Rgba8888);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn ids_follow_file_order() {
        let s = sheet();
        assert_eq!(s.id_from_name("entity/paddleRed"), 0);
        assert_eq!(s.id_from_name("entity/ballGrey"), 1);
        assert_eq!(s.id_from_name("entity/element_grey_rectangle"), 2);
        assert_eq!(s.try_id_from_name("entity/missing"), None);
    }

    #[test]
    fn repeated_lookups_are_stable() {
        let s = sheet();
        let a = s.id_from_name("entity/paddleRed");
        let b = s.id_from_name("entity/paddleRed");
        assert_eq!(a, b);
        assert_eq!(s.frame_data(a).bounds, s.frame_data(b).bounds);
        assert_eq!(s.uv_bounds(a), s.uv_bounds(b));
    }

    #[test]
    fn bounds_max_is_min_plus_size() {
        let s = sheet();
        let ball = s.frame_data(1);
        assert_eq!(ball.name, "entity/ballGrey");
        assert_eq!(ball.bounds.min, [64, 0]);
        assert_eq!(ball.bounds.max, [80, 16]);
        assert_eq!(ball.size, [16, 16]);
    }

    #[test]
    fn uv_bounds_divide_by_sheet_size() {
        let s = sheet();
        let uv = s.uv_bounds(2);
        assert_eq!(uv.min, Vec2::new(0.0, 0.25));
        assert_eq!(uv.max, Vec2::new(0.25, 0.5));
    }

    #[test]
    #[should_panic(expected = "no frame named")]
    fn unknown_name_panics() {
        sheet().id_from_name("entity/nope");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn frame_past_end_panics() {
        sheet().frame_data(3);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"{
            "frames": [
                { "filename": "a", "frame": { "x": 0, "y": 0, "w": 1, "h": 1 }, "sourceSize": { "w": 1, "h": 1 } },
                { "filename": "a", "frame": { "x": 1, "y": 0, "w": 1, "h": 1 }, "sourceSize": { "w": 1, "h": 1 } }
            ],
            "meta": { "image": "x.png", "format": "RGBA8888", "size": { "w": 2, "h": 1 } }
        }"#;
        let err = SpriteSheet::from_json_str(json, "").unwrap_err();
        assert!(err.to_string().contains("duplicate frame name a"));
    }

    fn single_frame(rect: &str) -> String {
        format!(
            r#"{{
                "frames": [ {{ "filename": "f", "frame": {rect}, "sourceSize": {{ "w": 1, "h": 1 }} }} ],
                "meta": {{ "image": "x.png", "format": "RGBA8888", "size": {{ "w": 2, "h": 1 }} }}
            }}"#
        )
    }

    #[test]
    fn frame_filling_the_sheet_is_accepted() {
        let s = SpriteSheet::from_json_str(&single_frame(r#"{ "x": 0, "y": 0, "w": 2, "h": 1 }"#), "")
            .unwrap();
        assert_eq!(s.uv_bounds(0), UvBounds::FULL);
    }

    #[test]
    fn overflowing_frame_is_rejected() {
        let json = single_frame(r#"{ "x": 2147483647, "y": 0, "w": 1, "h": 1 }"#);
        let err = SpriteSheet::from_json_str(&json, "").unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn negative_origin_is_rejected() {
        let json = single_frame(r#"{ "x": -4, "y": 0, "w": 8, "h": 1 }"#);
        assert!(SpriteSheet::from_json_str(&json, "").is_err());

        let json = single_frame(r#"{ "x": 0, "y": -1, "w": 1, "h": 1 }"#);
        assert!(SpriteSheet::from_json_str(&json, "").is_err());
    }

    #[test]
    fn frame_past_sheet_edge_is_rejected() {
        let json = single_frame(r#"{ "x": 1, "y": 0, "w": 2, "h": 1 }"#);
        let err = SpriteSheet::from_json_str(&json, "").unwrap_err();
        assert!(err.to_string().contains("past the 2x1 sheet"));

        let json = single_frame(r#"{ "x": 0, "y": 0, "w": 1, "h": 2 }"#);
        assert!(SpriteSheet::from_json_str(&json, "").is_err());
    }

    #[test]
    fn negative_size_is_rejected() {
        let json = single_frame(r#"{ "x": 0, "y": 0, "w": -1, "h": 1 }"#);
        assert!(SpriteSheet::from_json_str(&json, "").is_err());
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let json = r#"{
            "frames": [],
            "meta": { "image": "x.png", "format": "RGB888", "size": { "w": 2, "h": 1 } }
        }"#;
        assert!(SpriteSheet::from_json_str(json, "").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SpriteSheet::load("does/not/exist.json", DEFAULT_ASSET_DIR).unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.json"));
    }
}
