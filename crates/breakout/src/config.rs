use std::path::PathBuf;

use anyhow::{Context, Result};
use breakout_engine::atlas::DEFAULT_ASSET_DIR;
use breakout_engine::coords::{ColorRgba, Vec2};
use breakout_engine::sprite::RendererConfig;

/// Game configuration. Defaults match the shipped assets.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Directory holding the sprite sheet description and its image.
    pub asset_dir: PathBuf,
    /// Sheet description, relative to `asset_dir`.
    pub sprite_sheet: PathBuf,
    pub level: PathBuf,
    pub clear_color: ColorRgba,
    pub renderer: RendererConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            sprite_sheet: PathBuf::from("sprite_sheet.json"),
            level: PathBuf::from("assets/data/levels/level_01.txt"),
            clear_color: ColorRgba::new(0.157, 0.157, 0.157, 1.0),
            renderer: RendererConfig::with_reference_resolution(Vec2::new(640.0, 360.0)),
        }
    }
}

impl GameConfig {
    /// Defaults with `BREAKOUT_*` environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("BREAKOUT_ASSET_DIR") {
            config.asset_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("BREAKOUT_SPRITES_PER_BATCH") {
            let n: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("BREAKOUT_SPRITES_PER_BATCH={raw:?} is not a count"))?;
            anyhow::ensure!(n > 0, "BREAKOUT_SPRITES_PER_BATCH must be non-zero");
            config.renderer.sprites_per_batch = n;
        }

        Ok(config)
    }

    pub fn sprite_sheet_path(&self) -> PathBuf {
        self.asset_dir.join(&self.sprite_sheet)
    }
}
