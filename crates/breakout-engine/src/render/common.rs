//! Shared GPU types for the sprite pipeline.

use bytemuck::{Pod, Zeroable};

use crate::coords::Viewport;

// ── projection uniform ────────────────────────────────────────────────────

/// Orthographic projection over `[0, w] x [0, h]`, top-left origin.
///
/// The shader derives the full matrix from the extent; only the extent is uploaded.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ProjectionUniform {
    pub extent: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

impl ProjectionUniform {
    pub(super) fn new(viewport: Viewport) -> Self {
        Self {
            extent: [viewport.width, viewport.height],
            _pad: [0.0; 2],
        }
    }
}

/// Minimum binding size for the projection uniform buffer.
pub(super) fn projection_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<ProjectionUniform>() as u64)
        .expect("ProjectionUniform has non-zero size by construction")
}

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight alpha: sheet texels and tints are not premultiplied.
pub(super) fn straight_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── generation cache ──────────────────────────────────────────────────────

/// One cached GPU object, valid for a single source generation.
///
/// `u64::MAX` marks the cache as empty; generations are handed out from zero up.
pub(super) struct GenerationCache<T> {
    generation: u64,
    value: Option<T>,
}

impl<T> GenerationCache<T> {
    pub(super) const fn new() -> Self {
        Self {
            generation: u64::MAX,
            value: None,
        }
    }

    /// Returns the cached value for `generation`, building it when the source changed.
    pub(super) fn get_or_build(&mut self, generation: u64, build: impl FnOnce() -> T) -> &T {
        if self.generation != generation || self.value.is_none() {
            self.value = Some(build());
            self.generation = generation;
        }
        self.value.as_ref().expect("cache filled above")
    }

    pub(super) fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }
}
