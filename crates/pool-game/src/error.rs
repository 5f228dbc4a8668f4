//! Error types for setup validation and fatal in-game faults.
//!
//! Everything here is fatal: configuration errors stop a game from being built,
//! and a [`GameError`] returned from a frame aborts the current game. Ordinary
//! fouls, off-table balls and ignored shot attempts are game events, not errors.

use pool_engine::PhysicsError;
use thiserror::Error;

use crate::entities::BallId;

/// Invalid table, rack or rules configuration detected at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Preset JSON could not be parsed.
    #[error("invalid preset json: {0}")]
    Parse(#[from] serde_json::Error),

    /// Table has zero or negative extent.
    #[error("table must have positive size, got {width}x{height}")]
    EmptyTable { width: f32, height: f32 },

    /// A radius or other length that must be positive is not.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// Two pocket capture circles intersect.
    #[error("pockets {a} and {b} overlap")]
    OverlappingPockets { a: usize, b: usize },

    /// A pocket centre lies outside the table bounds.
    #[error("pocket {0} lies outside the table")]
    PocketOutsideTable(usize),

    /// The rack lists a cue ball; the cue ball is configured separately.
    #[error("rack slot {0} holds a cue ball")]
    CueInRack(usize),

    /// The rack must hold exactly one black ball.
    #[error("rack must contain exactly one black ball, found {0}")]
    BlackCount(usize),

    /// A racked ball or the cue spot does not fit inside the cushions.
    #[error("ball number {0} is racked outside the playing area")]
    BallOffTable(u8),

    /// A rules parameter is out of range.
    #[error("invalid rule setting: {0}")]
    InvalidRule(String),
}

/// Fatal fault while a game is running.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The entity model and the physics world disagree about a body.
    #[error("physics desync on ball {ball:?}: {source}")]
    BallDesync {
        ball: BallId,
        #[source]
        source: PhysicsError,
    },

    /// A cue stick body went missing while a shot was in flight.
    #[error("physics desync on cue stick: {0}")]
    CueDesync(#[source] PhysicsError),

    /// A cushion body went missing.
    #[error("physics desync on table: {0}")]
    TableDesync(#[source] PhysicsError),

    /// The cue ball has no live body when a shot is requested.
    #[error("cue ball is not on the table")]
    MissingCueBall,
}

impl GameError {
    pub(crate) fn ball(ball: BallId) -> impl FnOnce(PhysicsError) -> GameError {
        move |source| GameError::BallDesync { ball, source }
    }
}
