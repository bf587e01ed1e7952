use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::coords::Viewport;
use crate::sprite::{
    RendererConfig, SpriteBatch, SpriteVertex, StreamBackend, REGION_COUNT, VERTICES_PER_QUAD,
};

use super::common::{
    projection_min_binding_size, straight_alpha_blend, GenerationCache, ProjectionUniform,
};
use super::{RenderCtx, SheetTexture};

/// Sprite batch streaming through wgpu.
pub type WgpuSpriteBatch = SpriteBatch<WgpuStreamBackend>;

impl SpriteBatch<WgpuStreamBackend> {
    /// Creates the GPU resources and the batch on top of them.
    pub fn with_wgpu(ctx: &RenderCtx<'_>, config: RendererConfig) -> Result<Self> {
        let backend = WgpuStreamBackend::new(ctx, &config)?;
        SpriteBatch::new(backend, config)
    }
}

/// Completion marker for one queue submission.
///
/// Signaled once the queue has finished every submission up to and including
/// `index`; the flag is flipped by `Queue::on_submitted_work_done` during a poll.
#[derive(Debug)]
pub struct GpuFence {
    index: wgpu::SubmissionIndex,
    done: Arc<AtomicBool>,
}

impl GpuFence {
    #[inline]
    fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

/// `StreamBackend` over one wgpu vertex buffer shared by all regions.
///
/// Each flush records its own render pass (`LoadOp::Load`) on the bound target and
/// is submitted when the fence is placed, so the fence covers exactly that draw.
pub struct WgpuStreamBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    pipeline: wgpu::RenderPipeline,
    projection_bind_group: wgpu::BindGroup,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    vertex_buffer: wgpu::Buffer,

    white_bind_group: wgpu::BindGroup,
    sheet_bind_group: GenerationCache<wgpu::BindGroup>,
    sheet_active: bool,

    target: Option<wgpu::TextureView>,
    recorded: Vec<wgpu::CommandBuffer>,
}

impl WgpuStreamBackend {
    /// Fatal on an invalid reference resolution or a vertex buffer the device cannot hold.
    pub fn new(ctx: &RenderCtx<'_>, config: &RendererConfig) -> Result<Self> {
        let viewport = Viewport::from(config.reference_resolution);
        anyhow::ensure!(
            viewport.is_valid(),
            "invalid reference resolution {}x{}",
            viewport.width,
            viewport.height
        );

        let buffer_size = config
            .sprites_per_batch
            .checked_mul(REGION_COUNT * VERTICES_PER_QUAD * std::mem::size_of::<SpriteVertex>())
            .map(|n| n as u64)
            .context("sprite vertex buffer size overflows")?;
        let max_size = ctx.device.limits().max_buffer_size;
        anyhow::ensure!(
            buffer_size > 0 && buffer_size <= max_size,
            "sprite vertex buffer of {buffer_size} bytes not supported (device max {max_size})"
        );

        let device = ctx.device.clone();
        let queue = ctx.queue.clone();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("breakout sprite shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
        });

        let projection_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("breakout sprite projection bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(projection_min_binding_size()),
                    },
                    count: None,
                }],
            });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("breakout sprite texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("breakout sprite pipeline layout"),
            bind_group_layouts: &[&projection_bind_group_layout, &texture_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("breakout sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(straight_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let projection_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("breakout sprite projection ubo"),
            size: std::mem::size_of::<ProjectionUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(
            &projection_ubo,
            0,
            bytemuck::bytes_of(&ProjectionUniform::new(viewport)),
        );

        let projection_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("breakout sprite projection bind group"),
            layout: &projection_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_ubo.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("breakout sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("breakout sprite stream vbo"),
            size: buffer_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let white = SheetTexture::white(&device, &queue)?;
        let white_bind_group =
            texture_bind_group(&device, &texture_bind_group_layout, &sampler, &white);

        log::debug!("sprite stream buffer: {buffer_size} bytes");

        Ok(Self {
            device,
            queue,
            pipeline,
            projection_bind_group,
            texture_bind_group_layout,
            sampler,
            vertex_buffer,
            white_bind_group,
            sheet_bind_group: GenerationCache::new(),
            sheet_active: false,
            target: None,
            recorded: Vec::new(),
        })
    }
}

fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    texture: &SheetTexture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("breakout sprite texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(texture.view()),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

impl StreamBackend for WgpuStreamBackend {
    type Fence = GpuFence;
    type Target = wgpu::TextureView;
    type Texture = SheetTexture;

    fn bind(&mut self, target: wgpu::TextureView) {
        self.target = Some(target);
    }

    fn unbind(&mut self) {
        self.target = None;
        self.sheet_active = false;
    }

    fn bind_texture(&mut self, texture: &SheetTexture) {
        let (device, layout, sampler) =
            (&self.device, &self.texture_bind_group_layout, &self.sampler);
        let generation = texture.generation();
        self.sheet_bind_group.get_or_build(generation, || {
            log::debug!("sprite sheet bind group built (generation {generation})");
            texture_bind_group(device, layout, sampler, texture)
        });
        self.sheet_active = true;
    }

    fn bind_white_texture(&mut self) {
        self.sheet_active = false;
    }

    fn upload(&mut self, base_vertex: u32, vertices: &[SpriteVertex]) {
        let offset = u64::from(base_vertex) * std::mem::size_of::<SpriteVertex>() as u64;
        self.queue
            .write_buffer(&self.vertex_buffer, offset, bytemuck::cast_slice(vertices));
    }

    fn draw(&mut self, first_vertex: u32, vertex_count: u32) {
        let Some(target) = self.target.as_ref() else {
            debug_assert!(false, "draw without a bound target");
            log::error!("sprite draw issued without a bound target; dropped");
            return;
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("breakout sprite encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("breakout sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let textures = match self.sheet_bind_group.get() {
                Some(sheet) if self.sheet_active => sheet,
                _ => &self.white_bind_group,
            };

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.projection_bind_group, &[]);
            rpass.set_bind_group(1, textures, &[]);
            rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            rpass.draw(first_vertex..first_vertex + vertex_count, 0..1);
        }

        self.recorded.push(encoder.finish());
    }

    fn insert_fence(&mut self) -> GpuFence {
        let index = self.queue.submit(self.recorded.drain(..));

        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        self.queue
            .on_submitted_work_done(move || flag.store(true, Ordering::Release));

        GpuFence { index, done }
    }

    fn is_signaled(&mut self, fence: &GpuFence) -> bool {
        if fence.is_done() {
            return true;
        }
        // Runs ready callbacks without blocking.
        if let Err(e) = self.device.poll(wgpu::PollType::Poll) {
            log::warn!("device poll failed: {e}");
        }
        fence.is_done()
    }

    fn wait(&mut self, fence: &GpuFence) {
        if fence.is_done() {
            return;
        }
        loop {
            match self.device.poll(wgpu::PollType::Wait {
                submission_index: Some(fence.index.clone()),
                timeout: None,
            }) {
                Ok(_) => return,
                Err(wgpu::PollError::Timeout) => continue,
                Err(e) => panic!("waiting on sprite region fence failed: {e}"),
            }
        }
    }
}
