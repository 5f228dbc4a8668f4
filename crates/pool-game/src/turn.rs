//! Turn state machine and shot resolution rules.
//!
//! A shot walks `WaitingForAim → Shooting → Settling → Resolving` and lands
//! back on `WaitingForAim` for whoever plays next, or on `GameOver`. Every
//! transition happens at most once per frame.

use std::fmt;

use crate::balls::BallType;
use crate::detector::ShotOutcome;
use crate::entities::{Ball, BallId, PlayerId};
use crate::win;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    WaitingForAim,
    /// Impulse applied this frame.
    Shooting,
    /// Balls still rolling.
    Settling,
    /// Everything stopped; rules run next frame.
    Resolving,
    GameOver,
}

/// Why the last shot was a foul.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Foul {
    /// Cue ball dropped into a pocket.
    Scratch,
    /// A ball left the table without dropping.
    OffTable(BallId),
    /// The cue ball hit nothing.
    NoContact,
    /// The cue ball hit a ball outside the shooter's group first.
    WrongBallFirst(BallId),
}

impl Foul {
    /// Stable numeric code for the host event buffer.
    pub fn code(self) -> f32 {
        match self {
            Foul::Scratch => 1.0,
            Foul::OffTable(_) => 2.0,
            Foul::NoContact => 3.0,
            Foul::WrongBallFirst(_) => 4.0,
        }
    }
}

impl fmt::Display for Foul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Foul::Scratch => write!(f, "scratch"),
            Foul::OffTable(_) => write!(f, "ball off the table"),
            Foul::NoContact => write!(f, "no ball hit"),
            Foul::WrongBallFirst(_) => write!(f, "wrong ball hit first"),
        }
    }
}

/// Solid/striped assignment. Open until the first legal group pot, then fixed
/// for the rest of the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupAssignment {
    groups: Option<[BallType; 2]>,
}

impl GroupAssignment {
    pub fn is_open(&self) -> bool {
        self.groups.is_none()
    }

    pub fn group_of(&self, player: PlayerId) -> Option<BallType> {
        self.groups.map(|g| g[player.index()])
    }

    /// Give `group` to `player` and the other group to the opponent.
    /// Returns false, changing nothing, if groups are already assigned or
    /// `group` is not solids or stripes.
    pub fn assign(&mut self, player: PlayerId, group: BallType) -> bool {
        if self.groups.is_some() {
            return false;
        }
        let Some(other) = group.opposite() else {
            return false;
        };
        let mut groups = [other; 2];
        groups[player.index()] = group;
        self.groups = Some(groups);
        true
    }
}

/// What one resolution decided, for events and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub shooter: PlayerId,
    pub next: PlayerId,
    pub foul: Option<Foul>,
    /// The cue ball must go back on the spot.
    pub respot_cue: bool,
    /// Group handed to the shooter by this shot.
    pub assigned: Option<BallType>,
    pub winner: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub turn: PlayerId,
    pub groups: GroupAssignment,
    pub cue_ball: BallId,
    pub shot_in_progress: bool,
    pub last_foul: Option<Foul>,
    pub winner: Option<PlayerId>,
    pub phase: TurnPhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            turn: PlayerId::ONE,
            groups: GroupAssignment::default(),
            cue_ball: BallId::CUE,
            shot_in_progress: false,
            last_foul: None,
            winner: None,
            phase: TurnPhase::WaitingForAim,
        }
    }

    /// Re-entrancy guard for `WaitingForAim → Shooting`.
    ///
    /// Returns false, changing nothing, unless it is `player`'s turn and the
    /// table is waiting for a shot.
    pub fn begin_shot(&mut self, player: PlayerId) -> bool {
        if self.shot_in_progress
            || self.phase != TurnPhase::WaitingForAim
            || self.winner.is_some()
            || player != self.turn
        {
            return false;
        }
        self.shot_in_progress = true;
        self.phase = TurnPhase::Shooting;
        true
    }

    /// `Shooting → Settling`, once the impulse has gone through a step.
    pub fn launch(&mut self) {
        if self.phase == TurnPhase::Shooting {
            self.phase = TurnPhase::Settling;
        }
    }

    /// `Settling → Resolving` when every live ball has settled.
    pub fn settle(&mut self, balls: &[Ball], dt: f32, epsilon: f32) -> bool {
        if self.phase == TurnPhase::Settling && all_settled(balls, dt, epsilon) {
            self.phase = TurnPhase::Resolving;
            return true;
        }
        false
    }

    /// Apply the shot rules in order and leave `Resolving`.
    ///
    /// `balls` must already reflect the outcome (potted flags set).
    pub fn resolve(&mut self, balls: &[Ball], outcome: &ShotOutcome) -> Resolution {
        let shooter = self.turn;
        let mut res = Resolution {
            shooter,
            next: shooter.opponent(),
            foul: None,
            respot_cue: false,
            assigned: None,
            winner: None,
        };
        let type_of = |id: &BallId| balls.get(id.index()).map(|b| b.ball_type);
        let black_down = outcome.removed().any(|id| type_of(&id) == Some(BallType::Black));

        let cue_lost = outcome.cue_ball_lost(self.cue_ball);
        let stray = outcome.off_table.iter().find(|id| **id != self.cue_ball).copied();

        if cue_lost || stray.is_some() {
            // Scratch or off-table: foul, turn passes
            res.foul = Some(match (outcome.scratch, stray) {
                (true, _) => Foul::Scratch,
                (false, Some(id)) => Foul::OffTable(id),
                (false, None) => Foul::OffTable(self.cue_ball),
            });
            res.respot_cue = cue_lost;
            if black_down {
                res.winner = win::evaluate(self, balls, outcome);
            }
        } else {
            let mut keep_turn = false;

            if self.groups.is_open() {
                // Exactly one group went down: that group is the shooter's
                let mut kinds = outcome
                    .potted
                    .iter()
                    .filter_map(type_of)
                    .filter(|ty| ty.is_group());
                let first = kinds.next();
                if let Some(group) = first.filter(|g| kinds.all(|ty| ty == *g)) {
                    if self.groups.assign(shooter, group) {
                        res.assigned = Some(group);
                        keep_turn = true;
                    }
                }
            }

            if black_down {
                res.winner = win::evaluate(self, balls, outcome);
            } else if keep_turn {
                res.next = shooter;
            } else if let Some(group) = self.groups.group_of(shooter) {
                match outcome.first_contact {
                    Some(id) if !legal_first_contact(balls, id, group) => {
                        res.foul = Some(Foul::WrongBallFirst(id));
                    }
                    _ => {
                        if outcome.potted.iter().any(|id| type_of(id) == Some(group)) {
                            res.next = shooter;
                        }
                    }
                }
            }

            if res.foul.is_none()
                && res.next != shooter
                && outcome.potted.is_empty()
                && outcome.first_contact.is_none()
            {
                res.foul = Some(Foul::NoContact);
            }
        }

        self.last_foul = res.foul;
        self.shot_in_progress = false;
        if let Some(winner) = res.winner {
            self.winner = Some(winner);
            self.phase = TurnPhase::GameOver;
        } else {
            self.turn = res.next;
            self.phase = TurnPhase::WaitingForAim;
        }
        res
    }
}

/// Every live ball moved at most `epsilon` during the last frame.
pub fn all_settled(balls: &[Ball], dt: f32, epsilon: f32) -> bool {
    balls
        .iter()
        .filter(|b| b.is_live())
        .all(|b| b.vel.length() * dt <= epsilon)
}

/// Own group first, or the black once the group is cleared.
fn legal_first_contact(balls: &[Ball], first: BallId, group: BallType) -> bool {
    match balls.get(first.index()).map(|b| b.ball_type) {
        Some(ty) if ty == group => true,
        Some(BallType::Black) => win::group_cleared(balls, group),
        _ => false,
    }
}
