//! Breakout: paddle, ball and a wall of bricks drawn through the batched sprite renderer.

mod components;
mod config;
mod game;
mod level;
mod systems;

use anyhow::Result;
use breakout_engine::device::GpuInit;
use breakout_engine::logging::{init_logging, LoggingConfig};
use breakout_engine::window::{Runtime, RuntimeConfig};

use crate::config::GameConfig;
use crate::game::Game;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = GameConfig::from_env()?;
    let game = Game::new(&config)?;

    Runtime::run(
        RuntimeConfig {
            title: "Yet Another Breakout Clone".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        game,
    )
}
