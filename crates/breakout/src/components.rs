//! ECS components for the game entities.

use breakout_engine::coords::{ColorRgba, Vec2};

/// World position (metres) of the entity's centre.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
}

/// Sprite sheet frame and on-screen size (metres).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sprite {
    pub id: usize,
    pub size: Vec2,
    pub tint: ColorRgba,
}

/// Speed along each axis (metres per second).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

/// Signed heading per axis, usually -1, 0 or 1.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Direction {
    pub horizontal: f32,
    pub vertical: f32,
}

/// Offset applied to every brick when drawn; bricks store positions relative to it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BrickGroup {
    pub offset: Vec2,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct Brick;

#[derive(Debug, Copy, Clone, Default)]
pub struct Player;

#[derive(Debug, Copy, Clone, Default)]
pub struct Ball;
