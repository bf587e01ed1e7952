use anyhow::{Context, Result};
use breakout_engine::atlas::SpriteSheet;
use breakout_engine::coords::{ColorRgba, Vec2};
use breakout_engine::core::{App, AppControl, FrameCtx};
use breakout_engine::render::{RenderCtx, SheetTexture, WgpuSpriteBatch};
use breakout_engine::sprite::RendererConfig;

use crate::components::{Ball, BrickGroup, Direction, Player, Sprite, Transform, Velocity};
use crate::config::GameConfig;
use crate::level;
use crate::systems;

/// GPU-side state, created on the first frame once a device exists.
struct Renderer {
    batch: WgpuSpriteBatch,
    sheet_texture: SheetTexture,
}

pub struct Game {
    world: hecs::World,
    sheet: SpriteSheet,
    brick_group: BrickGroup,

    clear_color: ColorRgba,
    renderer_config: RendererConfig,
    renderer: Option<Renderer>,
}

impl Game {
    /// Loads the sheet and level and spawns paddle, ball and bricks.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let sheet = SpriteSheet::load(config.sprite_sheet_path(), &config.asset_dir)?;
        let layout = level::load_level(&config.level)?;

        let mut world = hecs::World::new();

        world.spawn((
            Transform {
                position: Vec2::new(5.0, 5.25),
            },
            Sprite {
                id: sheet.id_from_name("entity/paddleRed"),
                size: Vec2::new(1.0, 0.25),
                tint: ColorRgba::white(),
            },
            Velocity { x: 10.0, y: 0.0 },
            Direction::default(),
            Player,
        ));

        world.spawn((
            Transform {
                position: Vec2::new(5.0, 5.0),
            },
            Sprite {
                id: sheet.id_from_name("entity/ballGrey"),
                size: Vec2::splat(0.25),
                tint: ColorRgba::white(),
            },
            Velocity { x: 0.2, y: 0.0 },
            Direction {
                horizontal: -1.0,
                vertical: 0.0,
            },
            Ball,
        ));

        let brick_sprite = sheet.id_from_name("entity/element_grey_rectangle");
        let brick_group = level::spawn_level(&mut world, &layout, brick_sprite);

        Ok(Self {
            world,
            sheet,
            brick_group,
            clear_color: config.clear_color,
            renderer_config: config.renderer.clone(),
            renderer: None,
        })
    }

    fn ensure_renderer(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        if self.renderer.is_some() {
            return Ok(());
        }

        let sheet_texture = SheetTexture::load(ctx.device, ctx.queue, self.sheet.meta())
            .context("failed to upload sprite sheet")?;
        let batch = WgpuSpriteBatch::with_wgpu(ctx, self.renderer_config.clone())
            .context("failed to create sprite renderer")?;

        self.renderer = Some(Renderer {
            batch,
            sheet_texture,
        });
        Ok(())
    }
}

impl App for Game {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        for _ in 0..ctx.time.steps {
            systems::move_entities(&mut self.world, ctx.time.dt);
        }

        let clear = self.clear_color;
        ctx.render(clear, |rctx, view| {
            if let Err(e) = self.ensure_renderer(rctx) {
                log::error!("{e:#}");
                return AppControl::Exit;
            }
            let Some(renderer) = self.renderer.as_mut() else {
                return AppControl::Exit;
            };

            systems::render_sprites(
                &self.world,
                &mut renderer.batch,
                &self.sheet,
                &renderer.sheet_texture,
                view.clone(),
                self.brick_group,
            );
            AppControl::Continue
        })
    }

    fn on_exit(&mut self) {
        if let Some(renderer) = &self.renderer {
            let stats = renderer.batch.stats();
            log::info!(
                "last frame: {} sprites in {} draws, {} blocking waits",
                stats.sprites,
                stats.draw_calls,
                stats.blocking_waits
            );
        }
    }
}
