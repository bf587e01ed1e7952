use anyhow::Result;

use crate::coords::{ColorRgba, Vec2};

use super::region::RegionRing;
use super::vertex::{write_quad, UvBounds, VERTICES_PER_QUAD};
use super::{RendererConfig, StreamBackend};

/// Counters for the batch in progress (reset by `begin_batch`).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub sprites: usize,
    pub draw_calls: usize,
    pub blocking_waits: usize,
}

/// Streams sprite quads into rotating, fenced buffer regions.
///
/// Per frame: `begin_batch`, any number of `submit_*`, `end_batch`. Quads are
/// written straight into the current region; a region is drawn with exactly one
/// draw call when it fills or the batch ends, so a batch of `n` quads costs
/// `ceil(n / sprites_per_batch)` draw calls.
///
/// Geometry convention: `position` is the quad centre and `size` its full extent,
/// both in metres. They are scaled by `pixels_per_metre` into the reference
/// resolution (top-left origin, +Y down).
pub struct SpriteBatch<B: StreamBackend> {
    backend: B,
    ring: RegionRing<B::Fence>,

    current_sprite_count: usize,
    pixels_per_metre: f32,

    in_batch: bool,
    stats: BatchStats,
}

impl<B: StreamBackend> SpriteBatch<B> {
    /// Allocates the region ring. Fails if `sprites_per_batch` is zero or too large.
    pub fn new(backend: B, config: RendererConfig) -> Result<Self> {
        let ring = RegionRing::new(config.sprites_per_batch)?;

        log::info!(
            "sprite batch: {} regions x {} sprites, {} px/m, reference {}x{}",
            super::REGION_COUNT,
            config.sprites_per_batch,
            config.pixels_per_metre,
            config.reference_resolution.x,
            config.reference_resolution.y,
        );

        Ok(Self {
            backend,
            ring,
            current_sprite_count: 0,
            pixels_per_metre: config.pixels_per_metre,
            in_batch: false,
            stats: BatchStats::default(),
        })
    }

    /// Starts a batch drawing into `target` with the white texture bound.
    ///
    /// Does not rotate regions; fences whose work already completed are retired.
    pub fn begin_batch(&mut self, target: B::Target) {
        debug_assert!(!self.in_batch, "begin_batch called twice without end_batch");

        self.current_sprite_count = 0;
        self.stats = BatchStats::default();

        for fence in self.ring.fences_mut() {
            fence.retire_completed(&mut self.backend);
        }

        self.backend.bind(target);
        self.backend.bind_white_texture();
        self.in_batch = true;
    }

    /// Samples `texture` for subsequent quads. Quads already submitted are flushed first.
    pub fn use_sprite_sheet(&mut self, texture: &B::Texture) {
        debug_assert!(self.in_batch, "use_sprite_sheet outside begin_batch/end_batch");
        if self.current_sprite_count > 0 {
            self.flush();
        }
        self.backend.bind_texture(texture);
    }

    /// Returns to the white texture for subsequent quads.
    pub fn use_white_texture(&mut self) {
        debug_assert!(self.in_batch, "use_white_texture outside begin_batch/end_batch");
        if self.current_sprite_count > 0 {
            self.flush();
        }
        self.backend.bind_white_texture();
    }

    /// Textured quad centred on `position`.
    #[inline]
    pub fn submit_sprite(&mut self, position: Vec2, size: Vec2, tint: ColorRgba, uv_bounds: UvBounds) {
        self.submit_sprite_in_group(Vec2::zero(), position, size, tint, uv_bounds);
    }

    /// Untextured quad centred on `position`, covering the full bound texture.
    ///
    /// Meant for the white texture, which `begin_batch` binds.
    #[inline]
    pub fn submit_rect(&mut self, position: Vec2, size: Vec2, tint: ColorRgba) {
        self.submit_sprite_in_group(Vec2::zero(), position, size, tint, UvBounds::FULL);
    }

    /// Textured quad centred on `group_offset + position`.
    pub fn submit_sprite_in_group(
        &mut self,
        group_offset: Vec2,
        position: Vec2,
        size: Vec2,
        tint: ColorRgba,
        uv_bounds: UvBounds,
    ) {
        debug_assert!(self.in_batch, "submit outside begin_batch/end_batch");

        if self.current_sprite_count == self.ring.sprites_per_region() {
            self.flush();
        }

        let region = self.ring.current();

        // First write into a region since it last became current.
        if self.current_sprite_count == 0 && self.ring.fence_mut(region).wait(&mut self.backend) {
            self.stats.blocking_waits += 1;
            log::trace!("waited on fence for region {region}");
        }

        let centre = (group_offset + position) * self.pixels_per_metre;
        let half = size * self.pixels_per_metre / 2.0;

        let quad = self.ring.quad_mut(region, self.current_sprite_count);
        write_quad(quad, centre - half, centre + half, tint, uv_bounds);

        self.current_sprite_count += 1;
        self.stats.sprites += 1;
    }

    /// Draws the quads written to the current region, fences it, and advances.
    ///
    /// No-op when nothing was written since the last flush.
    pub fn flush(&mut self) {
        debug_assert!(self.in_batch, "flush outside begin_batch/end_batch");
        if self.current_sprite_count == 0 {
            return;
        }

        let region = self.ring.current();
        let base = self.ring.base_vertex(region);
        let vertex_count = self.current_sprite_count * VERTICES_PER_QUAD;

        self.backend.upload(base, &self.ring.region(region)[..vertex_count]);
        self.backend.draw(base, vertex_count as u32);
        self.current_sprite_count = 0;

        let fence = self.backend.insert_fence();
        self.ring.fence_mut(region).place(fence);
        self.ring.advance();

        self.stats.draw_calls += 1;
        log::trace!("flushed region {region}: {vertex_count} vertices from {base}");
    }

    /// Flushes any partial region and unbinds.
    pub fn end_batch(&mut self) {
        debug_assert!(self.in_batch, "end_batch without begin_batch");
        if self.current_sprite_count > 0 {
            self.flush();
        }
        self.backend.unbind();
        self.in_batch = false;

        log::trace!(
            "batch done: {} sprites, {} draws, {} blocking waits",
            self.stats.sprites,
            self.stats.draw_calls,
            self.stats.blocking_waits
        );
    }

    #[inline]
    pub fn current_region(&self) -> usize {
        self.ring.current()
    }

    #[inline]
    pub fn current_sprite_count(&self) -> usize {
        self.current_sprite_count
    }

    #[inline]
    pub fn sprites_per_batch(&self) -> usize {
        self.ring.sprites_per_region()
    }

    #[inline]
    pub fn pixels_per_metre(&self) -> f32 {
        self.pixels_per_metre
    }

    /// Draw calls issued since `begin_batch`.
    #[inline]
    pub fn draw_calls_this_batch(&self) -> usize {
        self.stats.draw_calls
    }

    /// Counters of the current (or last finished) batch.
    #[inline]
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
