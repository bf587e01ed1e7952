//! Per-frame systems over the game world.

use breakout_engine::atlas::SpriteSheet;
use breakout_engine::sprite::{SpriteBatch, StreamBackend};

use crate::components::{Ball, Brick, BrickGroup, Direction, Player, Sprite, Transform, Velocity};

/// Advances every moving entity by one step of `dt` seconds.
pub fn move_entities(world: &mut hecs::World, dt: f32) {
    for (_, (transform, velocity, direction)) in
        world.query_mut::<(&mut Transform, &Velocity, &Direction)>()
    {
        transform.position.x += direction.horizontal * velocity.x * dt;
        transform.position.y += direction.vertical * velocity.y * dt;
    }
}

/// Draws bricks (relative to `group`), then the player, then the ball, as one batch.
pub fn render_sprites<B: StreamBackend>(
    world: &hecs::World,
    batch: &mut SpriteBatch<B>,
    sheet: &SpriteSheet,
    texture: &B::Texture,
    target: B::Target,
    group: BrickGroup,
) {
    batch.begin_batch(target);
    batch.use_sprite_sheet(texture);

    for (_, (transform, sprite)) in world.query::<(&Transform, &Sprite)>().with::<&Brick>().iter() {
        batch.submit_sprite_in_group(
            group.offset,
            transform.position,
            sprite.size,
            sprite.tint,
            sheet.uv_bounds(sprite.id),
        );
    }

    for (_, (transform, sprite)) in world.query::<(&Transform, &Sprite)>().with::<&Player>().iter() {
        batch.submit_sprite(transform.position, sprite.size, sprite.tint, sheet.uv_bounds(sprite.id));
    }

    for (_, (transform, sprite)) in world.query::<(&Transform, &Sprite)>().with::<&Ball>().iter() {
        batch.submit_sprite(transform.position, sprite.size, sprite.tint, sheet.uv_bounds(sprite.id));
    }

    batch.end_batch();
}

#[cfg(test)]
mod tests {
    use super::*;
    use breakout_engine::coords::{ColorRgba, Vec2};
    use breakout_engine::sprite::{RendererConfig, SpriteVertex};

    #[derive(Default)]
    struct Capture {
        uploads: Vec<Vec<SpriteVertex>>,
        draws: usize,
        textures: usize,
    }

    impl StreamBackend for Capture {
        type Fence = ();
        type Target = ();
        type Texture = ();

        fn bind(&mut self, _target: ()) {}
        fn unbind(&mut self) {}
        fn bind_texture(&mut self, _texture: &()) {
            self.textures += 1;
        }
        fn bind_white_texture(&mut self) {}
        fn upload(&mut self, _base_vertex: u32, vertices: &[SpriteVertex]) {
            self.uploads.push(vertices.to_vec());
        }
        fn draw(&mut self, _first_vertex: u32, _vertex_count: u32) {
            self.draws += 1;
        }
        fn insert_fence(&mut self) {}
        fn is_signaled(&mut self, _fence: &()) -> bool {
            true
        }
        fn wait(&mut self, _fence: &()) {}
    }

    const SHEET: &str = r#"{
        "frames": [
            { "filename": "brick", "frame": { "x": 0, "y": 0, "w": 4, "h": 4 }, "sourceSize": { "w": 4, "h": 4 } },
            { "filename": "paddle", "frame": { "x": 4, "y": 0, "w": 4, "h": 4 }, "sourceSize": { "w": 4, "h": 4 } },
            { "filename": "ball", "frame": { "x": 0, "y": 4, "w": 4, "h": 4 }, "sourceSize": { "w": 4, "h": 4 } }
        ],
        "meta": { "image": "s.png", "format": "RGBA8888", "size": { "w": 8, "h": 8 } }
    }"#;

    fn sprite(id: usize) -> Sprite {
        Sprite {
            id,
            size: Vec2::splat(1.0),
            tint: ColorRgba::white(),
        }
    }

    fn centre(quad: &[SpriteVertex]) -> [f32; 2] {
        // BL and TR are the first two vertices.
        [
            (quad[0].pos[0] + quad[1].pos[0]) / 2.0,
            (quad[0].pos[1] + quad[1].pos[1]) / 2.0,
        ]
    }

    #[test]
    fn moves_by_direction_times_velocity() {
        let mut world = hecs::World::new();
        let e = world.spawn((
            Transform {
                position: Vec2::new(5.0, 5.0),
            },
            Velocity { x: 10.0, y: 2.0 },
            Direction {
                horizontal: -1.0,
                vertical: 1.0,
            },
        ));
        let still = world.spawn((Transform {
            position: Vec2::new(1.0, 1.0),
        },));

        move_entities(&mut world, 0.5);

        assert_eq!(world.get::<&Transform>(e).unwrap().position, Vec2::new(0.0, 6.0));
        assert_eq!(world.get::<&Transform>(still).unwrap().position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn bricks_then_player_then_ball_in_one_draw() {
        let sheet = SpriteSheet::from_json_str(SHEET, "").unwrap();
        let mut world = hecs::World::new();

        world.spawn((Transform { position: Vec2::new(3.0, 0.0) }, sprite(2), Ball));
        world.spawn((Transform { position: Vec2::new(2.0, 0.0) }, sprite(1), Player));
        world.spawn((Transform { position: Vec2::new(1.0, 0.0) }, sprite(0), Brick));

        let config = RendererConfig {
            pixels_per_metre: 1.0,
            ..RendererConfig::default()
        };
        let mut batch = SpriteBatch::new(Capture::default(), config).unwrap();
        let group = BrickGroup {
            offset: Vec2::new(0.0, 1.0),
        };

        render_sprites(&world, &mut batch, &sheet, &(), (), group);

        let backend = batch.backend();
        assert_eq!(backend.draws, 1);
        assert_eq!(backend.textures, 1);

        let vertices = &backend.uploads[0];
        assert_eq!(vertices.len(), 18);
        assert_eq!(centre(&vertices[0..6]), [1.0, 1.0]);
        assert_eq!(centre(&vertices[6..12]), [2.0, 0.0]);
        assert_eq!(centre(&vertices[12..18]), [3.0, 0.0]);

        // Ball quad samples the ball frame: TL uv at (0, 0.5).
        assert_eq!(vertices[14].uv, [0.0, 0.5]);
    }
}
