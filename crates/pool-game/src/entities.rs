//! Balls, cue sticks and the ids that name them.

use std::fmt;

use glam::Vec2;
use pool_engine::{BodyId, VectorColor};
use serde::{Deserialize, Serialize};

use crate::balls::{BallSpec, BallType};

/// Index of a ball in the game's ball list. The cue ball is always `BallId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u16);

impl BallId {
    pub const CUE: BallId = BallId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(0);
    pub const TWO: PlayerId = PlayerId(1);

    pub fn opponent(self) -> PlayerId {
        if self == PlayerId::ONE {
            PlayerId::TWO
        } else {
            PlayerId::ONE
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// A ball on (or formerly on) the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: BallId,
    pub number: u8,
    pub ball_type: BallType,
    pub radius: f32,
    pub color: VectorColor,
    /// Set once captured or driven off the table. Only the cue ball is ever
    /// brought back, by a respot.
    pub potted: bool,
    /// Exclusively owned physics body. `None` exactly when potted.
    pub body: Option<BodyId>,
    /// Render position, copied from the body each frame.
    pub pos: Vec2,
    /// Render velocity, copied from the body each frame.
    pub vel: Vec2,
}

impl Ball {
    pub fn new(id: BallId, spec: &BallSpec, radius: f32, pos: Vec2) -> Self {
        Self {
            id,
            number: spec.number,
            ball_type: spec.ball_type,
            radius,
            color: spec.color(),
            potted: false,
            body: None,
            pos,
            vel: Vec2::ZERO,
        }
    }

    pub fn is_cue(&self) -> bool {
        self.ball_type == BallType::Cue
    }

    /// On the table with a live body.
    pub fn is_live(&self) -> bool {
        !self.potted && self.body.is_some()
    }
}

/// A player's cue stick.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub owner: PlayerId,
    /// Aim angle in radians; the cue ball travels along this direction.
    pub angle: f32,
    /// Tracks the cursor while aiming, the stick body while in flight.
    pub pos: Vec2,
    /// Distance pulled back behind the cue ball.
    pub pullback: f32,
    /// Present only while a shot is in flight.
    pub body: Option<BodyId>,
    /// Frames since the body was created.
    pub flight_frames: u32,
}

impl Cue {
    pub fn new(owner: PlayerId) -> Self {
        Self {
            owner,
            angle: 0.0,
            pos: Vec2::ZERO,
            pullback: 0.0,
            body: None,
            flight_frames: 0,
        }
    }

    /// Unit vector along the aim angle.
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }
}
