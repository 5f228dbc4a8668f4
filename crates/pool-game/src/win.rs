//! Black-ball win evaluation.

use crate::balls::BallType;
use crate::detector::ShotOutcome;
use crate::entities::{Ball, PlayerId};
use crate::turn::{GameState, TurnPhase};

/// Decide the game if the black left the table this shot.
///
/// Only acts while `Resolving`. The shooter wins by pocketing the black
/// without losing the cue ball after clearing their own group; any other way
/// of losing the black hands the game to the opponent. Sets `state.winner`
/// when a winner is found and touches nothing else.
pub fn evaluate(state: &mut GameState, balls: &[Ball], outcome: &ShotOutcome) -> Option<PlayerId> {
    if state.phase != TurnPhase::Resolving {
        return None;
    }

    let black = outcome.removed().find(|id| {
        balls
            .get(id.index())
            .is_some_and(|b| b.ball_type == BallType::Black)
    })?;

    let shooter = state.turn;
    let legal = outcome.potted.contains(&black)
        && !outcome.cue_ball_lost(state.cue_ball)
        && state
            .groups
            .group_of(shooter)
            .is_some_and(|group| group_cleared(balls, group));

    let winner = if legal { shooter } else { shooter.opponent() };
    log::info!("black down, {} wins", winner);
    state.winner = Some(winner);
    Some(winner)
}

/// Every ball of `group` has left play. Balls knocked off the table count:
/// they were a foul when it happened and never come back.
pub fn group_cleared(balls: &[Ball], group: BallType) -> bool {
    balls
        .iter()
        .filter(|b| b.ball_type == group)
        .all(|b| b.potted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balls::BallSpec;
    use crate::entities::BallId;
    use glam::Vec2;

    fn balls(types: &[BallType]) -> Vec<Ball> {
        types
            .iter()
            .enumerate()
            .map(|(i, ty)| Ball::new(BallId(i as u16), &BallSpec::new(i as u8, *ty), 12.0, Vec2::ZERO))
            .collect()
    }

    fn resolving(turn: PlayerId, group: Option<BallType>) -> GameState {
        let mut state = GameState {
            phase: TurnPhase::Resolving,
            turn,
            ..GameState::new()
        };
        if let Some(group) = group {
            state.groups.assign(turn, group);
        }
        state
    }

    #[test]
    fn nothing_to_decide_without_the_black() {
        let set = balls(&[BallType::Cue, BallType::Solid, BallType::Black]);
        let mut state = resolving(PlayerId::ONE, Some(BallType::Solid));
        let outcome = ShotOutcome {
            potted: vec![BallId(1)],
            ..ShotOutcome::default()
        };
        assert_eq!(evaluate(&mut state, &set, &outcome), None);
        assert_eq!(state.winner, None);
    }

    #[test]
    fn only_runs_while_resolving() {
        let mut set = balls(&[BallType::Cue, BallType::Black]);
        set[1].potted = true;
        let mut state = GameState::new();
        let outcome = ShotOutcome {
            potted: vec![BallId(1)],
            ..ShotOutcome::default()
        };
        assert_eq!(evaluate(&mut state, &set, &outcome), None);
    }

    #[test]
    fn black_with_balls_left_goes_to_opponent() {
        let mut set = balls(&[BallType::Cue, BallType::Striped, BallType::Striped, BallType::Black]);
        set[1].potted = true;
        set[3].potted = true;
        let mut state = resolving(PlayerId::TWO, Some(BallType::Striped));
        let outcome = ShotOutcome {
            potted: vec![BallId(3)],
            ..ShotOutcome::default()
        };
        assert_eq!(evaluate(&mut state, &set, &outcome), Some(PlayerId::ONE));
        assert_eq!(state.winner, Some(PlayerId::ONE));
    }

    #[test]
    fn black_after_clearing_goes_to_shooter() {
        let mut set = balls(&[BallType::Cue, BallType::Striped, BallType::Black]);
        set[1].potted = true;
        set[2].potted = true;
        let mut state = resolving(PlayerId::TWO, Some(BallType::Striped));
        let outcome = ShotOutcome {
            potted: vec![BallId(2)],
            ..ShotOutcome::default()
        };
        assert_eq!(evaluate(&mut state, &set, &outcome), Some(PlayerId::TWO));
    }

    #[test]
    fn black_off_the_table_loses() {
        let mut set = balls(&[BallType::Cue, BallType::Solid, BallType::Black]);
        set[1].potted = true;
        set[2].potted = true;
        let mut state = resolving(PlayerId::ONE, Some(BallType::Solid));
        let outcome = ShotOutcome {
            off_table: vec![BallId(2)],
            ..ShotOutcome::default()
        };
        assert_eq!(evaluate(&mut state, &set, &outcome), Some(PlayerId::TWO));
    }

    #[test]
    fn group_ball_lost_off_the_table_still_clears() {
        let mut set = balls(&[BallType::Cue, BallType::Solid, BallType::Solid, BallType::Black]);
        // Ball 1 went off the table on an earlier foul, ball 2 was pocketed
        set[1].potted = true;
        set[2].potted = true;
        assert!(group_cleared(&set, BallType::Solid));

        set[3].potted = true;
        let mut state = resolving(PlayerId::ONE, Some(BallType::Solid));
        let outcome = ShotOutcome {
            potted: vec![BallId(3)],
            ..ShotOutcome::default()
        };
        assert_eq!(evaluate(&mut state, &set, &outcome), Some(PlayerId::ONE));
    }

    #[test]
    fn black_on_open_table_loses() {
        let mut set = balls(&[BallType::Cue, BallType::Solid, BallType::Black]);
        set[2].potted = true;
        let mut state = resolving(PlayerId::ONE, None);
        let outcome = ShotOutcome {
            potted: vec![BallId(2)],
            ..ShotOutcome::default()
        };
        assert_eq!(evaluate(&mut state, &set, &outcome), Some(PlayerId::TWO));
    }
}
