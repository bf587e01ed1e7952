use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};

use crate::atlas::{ImageFormat, SpriteSheetMeta};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(0);

fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// GPU copy of a sprite sheet image (RGBA8, sRGB).
pub struct SheetTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: [u32; 2],
    /// Unique per upload; keys bind groups built over this texture.
    generation: u64,
}

impl SheetTexture {
    /// Loads and uploads the image named by `meta`.
    ///
    /// The decoded image must match `meta.dimensions`, otherwise every UV derived
    /// from the sheet would be off.
    pub fn load(device: &wgpu::Device, queue: &wgpu::Queue, meta: &SpriteSheetMeta) -> Result<Self> {
        match meta.format {
            ImageFormat::Rgba8888 => {}
        }

        let image = image::open(&meta.image)
            .with_context(|| format!("failed to load sprite sheet image {}", meta.image.display()))?
            .to_rgba8();

        let (width, height) = image.dimensions();
        anyhow::ensure!(
            [width, height] == meta.dimensions,
            "sprite sheet image {} is {width}x{height}, metadata says {}x{}",
            meta.image.display(),
            meta.dimensions[0],
            meta.dimensions[1],
        );

        let label = meta.image.to_string_lossy();
        Self::from_rgba8(device, queue, &label, width, height, image.as_raw())
    }

    /// Uploads tightly packed RGBA8 pixels.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "texture {label} has zero size");
        anyhow::ensure!(
            pixels.len() as u64 == u64::from(width) * u64::from(height) * 4,
            "texture {label}: {} bytes do not match {width}x{height} RGBA8",
            pixels.len(),
        );

        let extent = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            _texture: texture,
            view,
            size: [width, height],
            generation: next_generation(),
        })
    }

    /// 1x1 opaque white, used for untextured quads.
    pub(crate) fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Self> {
        Self::from_rgba8(device, queue, "breakout white texture", 1, 1, &[255; 4])
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Size in pixels.
    #[inline]
    pub fn size(&self) -> [u32; 2] {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_are_unique() {
        let a = next_generation();
        let b = next_generation();
        assert_ne!(a, b);
        assert_ne!(a, u64::MAX);
    }
}
