//! Level files: one line per brick row, whitespace separated brick types.
//!
//! `0` leaves a hole; any other value places a brick. Blank lines are empty rows.

use std::path::Path;

use anyhow::{Context, Result};
use breakout_engine::coords::{ColorRgba, Vec2};

use crate::components::{Brick, BrickGroup, Sprite, Transform};

/// Brick extent in metres.
pub const BRICK_SIZE: Vec2 = Vec2::new(0.75, 0.25);

/// Space between neighbouring bricks in metres.
pub const BRICK_GAP: f32 = 0.031_25;

/// Horizontal centre the brick rows are laid out around (half the 10 m playfield).
const PLAYFIELD_CENTRE_X: f32 = 5.0;

/// Distance from the top of the playfield to the top of the first row.
const TOP_MARGIN: f32 = 0.25;

/// Parsed level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelLayout {
    /// `(column, row)` of every brick, in file order.
    pub bricks: Vec<(usize, usize)>,
    /// Width of the widest row, holes included.
    pub bricks_per_row: usize,
    /// Number of lines, blank ones included.
    pub rows: usize,
}

impl LevelLayout {
    /// Position of a brick relative to the group offset.
    pub fn brick_position(column: usize, row: usize) -> Vec2 {
        Vec2::new(
            column as f32 * (BRICK_SIZE.x + BRICK_GAP),
            row as f32 * (BRICK_SIZE.y + BRICK_GAP),
        )
    }

    /// Offset that centres the rows on the playfield and hangs them below the top.
    pub fn group_offset(&self) -> Vec2 {
        let mid = self.bricks_per_row as f32 / 2.0;
        Vec2::new(
            BRICK_GAP / 2.0 + PLAYFIELD_CENTRE_X - (mid * BRICK_SIZE.x + mid * BRICK_GAP)
                + BRICK_SIZE.x / 2.0,
            TOP_MARGIN + BRICK_SIZE.y / 2.0,
        )
    }
}

pub fn parse_level(text: &str) -> Result<LevelLayout> {
    let mut layout = LevelLayout::default();

    for (row, line) in text.lines().enumerate() {
        let mut width = 0;
        for (column, token) in line.split_whitespace().enumerate() {
            let brick_type: u32 = token
                .parse()
                .with_context(|| format!("line {}: invalid brick type {token:?}", row + 1))?;
            if brick_type != 0 {
                layout.bricks.push((column, row));
            }
            width = column + 1;
        }
        layout.bricks_per_row = layout.bricks_per_row.max(width);
        layout.rows = row + 1;
    }

    Ok(layout)
}

pub fn load_level(path: impl AsRef<Path>) -> Result<LevelLayout> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read level {}", path.display()))?;
    parse_level(&text).with_context(|| format!("invalid level {}", path.display()))
}

/// Spawns one entity per brick and returns the group they are drawn relative to.
pub fn spawn_level(world: &mut hecs::World, layout: &LevelLayout, sprite_id: usize) -> BrickGroup {
    let bricks = layout.bricks.iter().map(|&(column, row)| {
        (
            Transform {
                position: LevelLayout::brick_position(column, row),
            },
            Sprite {
                id: sprite_id,
                size: BRICK_SIZE,
                tint: ColorRgba::white(),
            },
            Brick,
        )
    });
    world.spawn_batch(bricks);

    log::debug!(
        "level: {} bricks in {} rows of {}",
        layout.bricks.len(),
        layout.rows,
        layout.bricks_per_row
    );

    BrickGroup {
        offset: layout.group_offset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn holes_are_skipped_and_rows_counted() {
        let layout = parse_level("1 1 0 1\n0 2\n\n1\n").unwrap();
        assert_eq!(layout.bricks, vec![(0, 0), (1, 0), (3, 0), (1, 1), (0, 3)]);
        assert_eq!(layout.bricks_per_row, 4);
        assert_eq!(layout.rows, 4);
    }

    #[test]
    fn non_numeric_tokens_are_rejected() {
        let err = parse_level("1 1\n1 x 1\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
        assert!(parse_level("-1").is_err());
    }

    #[test]
    fn empty_level_has_no_bricks() {
        let layout = parse_level("").unwrap();
        assert!(layout.bricks.is_empty());
        assert_eq!(layout.bricks_per_row, 0);
    }

    #[test]
    fn bricks_are_spaced_by_size_plus_gap() {
        let p = LevelLayout::brick_position(2, 3);
        assert!(close(p, Vec2::new(2.0 * 0.781_25, 3.0 * 0.281_25)));
    }

    #[test]
    fn rows_are_centred_on_the_playfield() {
        let layout = parse_level("1 1 1 1 1 1 1 1 1 1 1 1").unwrap();
        let offset = layout.group_offset();

        // First and last brick centres sit symmetrically around x = 5.
        let first = offset.x;
        let last = offset.x + LevelLayout::brick_position(11, 0).x;
        assert!(((first + last) / 2.0 - 5.0).abs() < 1e-4);
        assert!((offset.y - 0.375).abs() < 1e-6);
    }

    #[test]
    fn spawn_creates_tagged_bricks() {
        let mut world = hecs::World::new();
        let layout = parse_level("1 0 1").unwrap();
        let group = spawn_level(&mut world, &layout, 7);

        let mut positions: Vec<_> = world
            .query::<(&Transform, &Sprite)>()
            .with::<&Brick>()
            .iter()
            .map(|(_, (t, s))| {
                assert_eq!(s.id, 7);
                assert_eq!(s.size, BRICK_SIZE);
                t.position.x
            })
            .collect();
        positions.sort_by(f32::total_cmp);

        assert_eq!(positions.len(), 2);
        assert!((positions[1] - 2.0 * 0.781_25).abs() < 1e-6);
        assert_eq!(group.offset, layout.group_offset());
    }
}
