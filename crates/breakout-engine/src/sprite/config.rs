use crate::coords::Vec2;

/// Default quads per region.
pub const DEFAULT_SPRITES_PER_BATCH: usize = 1_000;

/// Sprite renderer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Logical viewport the projection maps onto the surface (px).
    pub reference_resolution: Vec2,

    /// World-to-logical scale applied to submitted positions and sizes.
    pub pixels_per_metre: f32,

    /// Quad capacity of each streaming region; one draw call covers at most this many.
    pub sprites_per_batch: usize,
}

impl RendererConfig {
    /// Config for `reference_resolution`, with a scale of one tenth of its width per metre.
    pub fn with_reference_resolution(reference_resolution: Vec2) -> Self {
        Self {
            reference_resolution,
            pixels_per_metre: reference_resolution.x / 10.0,
            sprites_per_batch: DEFAULT_SPRITES_PER_BATCH,
        }
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::with_reference_resolution(Vec2::new(640.0, 360.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_reference_width() {
        let c = RendererConfig::default();
        assert_eq!(c.reference_resolution, Vec2::new(640.0, 360.0));
        assert_eq!(c.pixels_per_metre, 64.0);
        assert_eq!(c.sprites_per_batch, 1_000);

        let wide = RendererConfig::with_reference_resolution(Vec2::new(1280.0, 720.0));
        assert_eq!(wide.pixels_per_metre, 128.0);
    }
}
