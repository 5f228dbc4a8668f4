pub mod balls;
pub mod config;
pub mod cue;
pub mod detector;
pub mod entities;
pub mod error;
pub mod game;
pub mod render;
pub mod sync;
pub mod table;
pub mod turn;
pub mod win;

#[cfg(test)]
mod testing;

pub use config::{PhysicsTuning, PoolConfig, RackPreset, RulesConfig, TablePreset};
pub use detector::ShotOutcome;
pub use entities::{Ball, BallId, Cue, PlayerId};
pub use error::{ConfigError, GameError};
pub use game::PoolGame;
pub use turn::{Foul, GameState, TurnPhase};

#[cfg(feature = "physics")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "physics")]
pool_web::export_game!(
    game::PoolGame<pool_engine::PhysicsWorld>,
    "pool-game",
    game::PoolGame::eight_ball,
    json = game::PoolGame::from_json
);
