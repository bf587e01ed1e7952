use bytemuck::{Pod, Zeroable};

use crate::coords::{ColorRgba, Vec2};

/// Two triangles per quad.
pub const VERTICES_PER_QUAD: usize = 6;

/// Streamed sprite vertex.
///
/// Layout is fixed: `pos` (logical px), `tint` (straight RGBA), `uv` (normalized).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub pos: [f32; 2],
    pub tint: [f32; 4],
    pub uv: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<SpriteVertex>() == 8 * std::mem::size_of::<f32>());

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4, // tint
        2 => Float32x2  // uv
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Normalized subtexture bounds (`[0, 1]` UV space, +V down).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvBounds {
    /// The whole texture.
    pub const FULL: UvBounds = UvBounds {
        min: Vec2::new(0.0, 0.0),
        max: Vec2::new(1.0, 1.0),
    };

    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

impl Default for UvBounds {
    fn default() -> Self {
        Self::FULL
    }
}

/// Writes one quad spanning `min..max` (logical px) as two triangles.
///
/// Vertex order is BL, TR, TL, BL, BR, TR. Corners map to UVs as
/// TL = `uv.min`, TR = `(uv.max.x, uv.min.y)`, BL = `(uv.min.x, uv.max.y)`, BR = `uv.max`.
pub(crate) fn write_quad(
    dst: &mut [SpriteVertex; VERTICES_PER_QUAD],
    min: Vec2,
    max: Vec2,
    tint: ColorRgba,
    uv: UvBounds,
) {
    let tint = tint.to_array();
    let corner = |x: f32, y: f32, u: f32, v: f32| SpriteVertex {
        pos: [x, y],
        tint,
        uv: [u, v],
    };

    let top_left = corner(min.x, min.y, uv.min.x, uv.min.y);
    let top_right = corner(max.x, min.y, uv.max.x, uv.min.y);
    let bottom_left = corner(min.x, max.y, uv.min.x, uv.max.y);
    let bottom_right = corner(max.x, max.y, uv.max.x, uv.max.y);

    *dst = [
        bottom_left,
        top_right,
        top_left,
        bottom_left,
        bottom_right,
        top_right,
    ];
}
