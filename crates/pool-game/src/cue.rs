//! Maps pointer input to the active player's cue and produces shots.

use glam::Vec2;
use pool_engine::InputEvent;

use crate::config::RulesConfig;
use crate::entities::{Cue, PlayerId};
use crate::turn::{GameState, TurnPhase};

/// A shot ready to be applied to the cue ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub player: PlayerId,
    pub impulse: Vec2,
    /// Where the stick tip sits at release.
    pub tip: Vec2,
    pub angle: f32,
}

/// Aim and pullback from pointer events.
///
/// Moving the pointer aims: the cue ball will travel toward the cursor.
/// Dragging pulls the stick back along the aim line. `Shoot` releases.
#[derive(Debug, Clone, Default)]
pub struct CueController {
    local_player: Option<PlayerId>,
}

impl CueController {
    pub fn new(local_player: Option<PlayerId>) -> Self {
        Self { local_player }
    }

    /// The player whose cue input may move right now, if any.
    pub fn active_player(&self, state: &GameState) -> Option<PlayerId> {
        if state.phase != TurnPhase::WaitingForAim || state.winner.is_some() {
            return None;
        }
        match self.local_player {
            Some(local) if local != state.turn => None,
            _ => Some(state.turn),
        }
    }

    /// Apply one input event. Only the active player's cue is touched.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        state: &GameState,
        cues: &mut [Cue],
        cue_ball: Vec2,
        ball_radius: f32,
        rules: &RulesConfig,
    ) -> Option<ShotRequest> {
        let player = self.active_player(state)?;
        let cue = cues.get_mut(player.index())?;

        match *event {
            InputEvent::PointerMove { x, y } => {
                let cursor = Vec2::new(x, y);
                let to_cursor = cursor - cue_ball;
                if to_cursor.length_squared() > f32::EPSILON {
                    cue.angle = to_cursor.y.atan2(to_cursor.x);
                }
                cue.pos = cursor;
                None
            }
            InputEvent::PointerDown { .. } => {
                cue.pullback = 0.0;
                None
            }
            InputEvent::PointerDrag { x, y } => {
                let behind = cue_ball - Vec2::new(x, y);
                cue.pullback = behind.dot(cue.direction()).clamp(0.0, rules.max_pullback);
                None
            }
            InputEvent::Shoot => {
                let dir = cue.direction();
                let power = (cue.pullback * rules.power_per_unit).clamp(rules.min_power, rules.max_power);
                let tip = cue_ball - dir * (ball_radius + 2.0);
                cue.pullback = 0.0;
                Some(ShotRequest {
                    player,
                    impulse: dir * power,
                    tip,
                    angle: cue.angle,
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cues() -> Vec<Cue> {
        vec![Cue::new(PlayerId::ONE), Cue::new(PlayerId::TWO)]
    }

    const BALL: Vec2 = Vec2::new(300.0, 300.0);

    fn feed(
        ctl: &mut CueController,
        state: &GameState,
        cues: &mut [Cue],
        events: &[InputEvent],
    ) -> Option<ShotRequest> {
        let rules = RulesConfig::default();
        let mut shot = None;
        for e in events {
            if let Some(s) = ctl.handle(e, state, cues, BALL, 12.0, &rules) {
                shot = Some(s);
            }
        }
        shot
    }

    #[test]
    fn aim_follows_cursor() {
        let mut ctl = CueController::default();
        let state = GameState::new();
        let mut cues = cues();
        feed(&mut ctl, &state, &mut cues, &[InputEvent::PointerMove { x: 300.0, y: 400.0 }]);
        assert!((cues[0].angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(cues[0].pos, Vec2::new(300.0, 400.0));
    }

    #[test]
    fn pullback_is_clamped() {
        let mut ctl = CueController::default();
        let state = GameState::new();
        let mut cues = cues();
        // Aim right, drag left (behind the ball)
        feed(
            &mut ctl,
            &state,
            &mut cues,
            &[
                InputEvent::PointerMove { x: 500.0, y: 300.0 },
                InputEvent::PointerDown { x: 300.0, y: 300.0 },
                InputEvent::PointerDrag { x: 240.0, y: 300.0 },
            ],
        );
        assert!((cues[0].pullback - 60.0).abs() < 1e-3);

        feed(&mut ctl, &state, &mut cues, &[InputEvent::PointerDrag { x: -900.0, y: 300.0 }]);
        assert_eq!(cues[0].pullback, RulesConfig::default().max_pullback);

        // Dragging in front of the ball is no pullback at all
        feed(&mut ctl, &state, &mut cues, &[InputEvent::PointerDrag { x: 400.0, y: 300.0 }]);
        assert_eq!(cues[0].pullback, 0.0);
    }

    #[test]
    fn shoot_produces_clamped_impulse_along_aim() {
        let rules = RulesConfig::default();
        let mut ctl = CueController::default();
        let state = GameState::new();
        let mut cues = cues();
        let shot = feed(
            &mut ctl,
            &state,
            &mut cues,
            &[
                InputEvent::PointerMove { x: 500.0, y: 300.0 },
                InputEvent::PointerDrag { x: 250.0, y: 300.0 },
                InputEvent::Shoot,
            ],
        )
        .unwrap();
        assert_eq!(shot.player, PlayerId::ONE);
        assert!((shot.impulse.x - 50.0 * rules.power_per_unit).abs() < 1e-2);
        assert!(shot.impulse.y.abs() < 1e-3);
        assert!(shot.tip.x < BALL.x);
        assert_eq!(cues[0].pullback, 0.0);

        // No pullback still fires at minimum power
        let shot = feed(&mut ctl, &state, &mut cues, &[InputEvent::Shoot]).unwrap();
        assert!((shot.impulse.length() - rules.min_power).abs() < 1e-3);
    }

    #[test]
    fn input_ignored_when_not_waiting() {
        let mut ctl = CueController::default();
        let state = GameState {
            phase: TurnPhase::Settling,
            ..GameState::new()
        };
        let mut cues = cues();
        let before = cues.clone();
        let shot = feed(
            &mut ctl,
            &state,
            &mut cues,
            &[InputEvent::PointerMove { x: 1.0, y: 2.0 }, InputEvent::Shoot],
        );
        assert!(shot.is_none());
        assert_eq!(cues, before);
    }

    #[test]
    fn remote_players_cue_is_never_touched() {
        let mut ctl = CueController::new(Some(PlayerId::ONE));
        let state = GameState {
            turn: PlayerId::TWO,
            ..GameState::new()
        };
        let mut cues = cues();
        let before = cues.clone();
        let shot = feed(
            &mut ctl,
            &state,
            &mut cues,
            &[InputEvent::PointerMove { x: 10.0, y: 10.0 }, InputEvent::Shoot],
        );
        assert!(shot.is_none());
        assert_eq!(cues, before);
    }

    #[test]
    fn hot_seat_moves_only_the_current_players_cue() {
        let mut ctl = CueController::default();
        let state = GameState {
            turn: PlayerId::TWO,
            ..GameState::new()
        };
        let mut cues = cues();
        feed(&mut ctl, &state, &mut cues, &[InputEvent::PointerMove { x: 300.0, y: 100.0 }]);
        assert_eq!(cues[0], Cue::new(PlayerId::ONE));
        assert_eq!(cues[1].pos, Vec2::new(300.0, 100.0));
    }
}
