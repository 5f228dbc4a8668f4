//! Pot and foul detection against pocket geometry.

use pool_engine::{BodyId, PhysicsEngine};

use crate::entities::{Ball, BallId};
use crate::error::GameError;
use crate::table::Table;

/// What happened to the balls during one frame, or accumulated over a shot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotOutcome {
    /// Balls captured by a pocket, in detection order.
    pub potted: Vec<BallId>,
    /// The cue ball dropped into a pocket.
    pub scratch: bool,
    /// First object ball the cue ball touched.
    pub first_contact: Option<BallId>,
    /// Balls that left the table without dropping into a pocket.
    pub off_table: Vec<BallId>,
}

impl ShotOutcome {
    /// Fold a later frame into this outcome. The earliest first contact wins.
    pub fn merge(&mut self, later: ShotOutcome) {
        self.potted.extend(later.potted);
        self.scratch |= later.scratch;
        if self.first_contact.is_none() {
            self.first_contact = later.first_contact;
        }
        self.off_table.extend(later.off_table);
    }

    /// True when the cue ball was pocketed or knocked off the table.
    pub fn cue_ball_lost(&self, cue_ball: BallId) -> bool {
        self.scratch || self.off_table.contains(&cue_ball)
    }

    /// Every ball removed from play, pocketed or not.
    pub fn removed(&self) -> impl Iterator<Item = BallId> + '_ {
        self.potted.iter().chain(self.off_table.iter()).copied()
    }

    pub fn is_empty(&self) -> bool {
        *self == ShotOutcome::default()
    }
}

/// Capture and off-table checks for one frame.
///
/// Balls are scanned in ascending id. A captured ball is marked potted, its
/// body destroyed and its id appended to the pocket's list; a potted ball is
/// never looked at again. Must run after the frame's `sync`.
pub fn detect<P: PhysicsEngine + ?Sized>(
    physics: &mut P,
    table: &mut Table,
    balls: &mut [Ball],
    containment: f32,
) -> Result<ShotOutcome, GameError> {
    let mut outcome = ShotOutcome {
        first_contact: first_contact(&*physics, balls),
        ..ShotOutcome::default()
    };

    let bounds = table.bounds;
    for ball in balls.iter_mut() {
        if ball.potted {
            continue;
        }
        let Some(body) = ball.body else {
            continue;
        };

        let pocket = table
            .pockets_mut()
            .iter_mut()
            .enumerate()
            .find(|(_, p)| p.holds(ball.pos, ball.radius, containment));

        if let Some((index, pocket)) = pocket {
            physics.destroy_body(body).map_err(GameError::ball(ball.id))?;
            ball.body = None;
            ball.potted = true;
            ball.vel = glam::Vec2::ZERO;
            pocket.capture(ball.id);
            if ball.is_cue() {
                outcome.scratch = true;
            }
            outcome.potted.push(ball.id);
            log::info!("ball {} dropped into pocket {}", ball.number, index);
        } else if !bounds.contains(ball.pos) {
            physics.destroy_body(body).map_err(GameError::ball(ball.id))?;
            ball.body = None;
            ball.potted = true;
            ball.vel = glam::Vec2::ZERO;
            outcome.off_table.push(ball.id);
            log::warn!("ball {} left the table at {:?}", ball.number, ball.pos);
        }
    }

    Ok(outcome)
}

/// Lowest-id object ball the cue ball started touching during the last step.
fn first_contact<P: PhysicsEngine + ?Sized>(physics: &P, balls: &[Ball]) -> Option<BallId> {
    let cue_body = balls.iter().find(|b| b.is_cue())?.body?;
    let ball_for = |body: BodyId| balls.iter().find(|b| b.body == Some(body)).map(|b| b.id);

    physics
        .contacts()
        .iter()
        .filter(|c| c.started)
        .filter_map(|c| c.other(cue_body))
        .filter_map(ball_for)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balls::{BallSpec, BallType};
    use crate::config::PoolConfig;
    use crate::testing::ScriptedPhysics;
    use glam::Vec2;
    use pool_engine::{BodyDesc, ColliderDesc, ColliderMaterial};

    struct Setup {
        physics: ScriptedPhysics,
        table: Table,
        balls: Vec<Ball>,
    }

    fn setup(specs: &[(u8, BallType, Vec2)]) -> Setup {
        let config = PoolConfig::eight_ball().unwrap();
        let table = Table::from_preset(&config.table);
        let mut physics = ScriptedPhysics::new();
        let balls = specs
            .iter()
            .enumerate()
            .map(|(i, (number, ty, pos))| {
                let mut ball = Ball::new(BallId(i as u16), &BallSpec::new(*number, *ty), 12.0, *pos);
                let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 12.0 }).with_position(*pos);
                ball.body = Some(physics.create_body(&desc, ColliderMaterial::default()));
                ball
            })
            .collect();
        Setup {
            physics,
            table,
            balls,
        }
    }

    #[test]
    fn captures_ball_inside_containment() {
        let table = Table::from_preset(&PoolConfig::eight_ball().unwrap().table);
        let corner = table.pockets()[0].pos;
        let mut s = setup(&[
            (0, BallType::Cue, Vec2::new(400.0, 300.0)),
            (3, BallType::Solid, corner + Vec2::new(5.0, 5.0)),
        ]);
        let body = s.balls[1].body.unwrap();

        let out = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        assert_eq!(out.potted, vec![BallId(1)]);
        assert!(!out.scratch);
        assert!(s.balls[1].potted);
        assert_eq!(s.balls[1].body, None);
        assert!(!s.physics.is_alive(body));
        assert_eq!(s.table.pockets()[0].captured(), &[BallId(1)]);
    }

    #[test]
    fn grazing_the_edge_is_not_a_pot() {
        let table = Table::from_preset(&PoolConfig::eight_ball().unwrap().table);
        let side = table.pockets()[4].pos;
        // 25 units from centre: inside 28 but outside 28 - 6
        let mut s = setup(&[(5, BallType::Solid, side + Vec2::new(0.0, 25.0))]);
        let out = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        assert!(out.is_empty());
        assert!(!s.balls[0].potted);
    }

    #[test]
    fn each_ball_is_captured_once() {
        let table = Table::from_preset(&PoolConfig::eight_ball().unwrap().table);
        let corner = table.pockets()[3].pos;
        let mut s = setup(&[(2, BallType::Solid, corner)]);

        let first = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        let second = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        assert_eq!(first.potted.len(), 1);
        assert!(second.is_empty());
        assert_eq!(s.table.pockets()[3].captured().len(), 1);
    }

    #[test]
    fn cue_ball_capture_is_a_scratch() {
        let table = Table::from_preset(&PoolConfig::eight_ball().unwrap().table);
        let corner = table.pockets()[1].pos;
        let mut s = setup(&[(0, BallType::Cue, corner)]);
        let out = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        assert!(out.scratch);
        assert!(out.cue_ball_lost(BallId::CUE));
    }

    #[test]
    fn detection_order_is_by_ball_id() {
        let table = Table::from_preset(&PoolConfig::eight_ball().unwrap().table);
        let a = table.pockets()[2].pos;
        let b = table.pockets()[0].pos;
        let mut s = setup(&[
            (1, BallType::Solid, a),
            (9, BallType::Striped, b),
            (2, BallType::Solid, a + Vec2::new(1.0, 0.0)),
        ]);
        let out = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        assert_eq!(out.potted, vec![BallId(0), BallId(1), BallId(2)]);
        assert_eq!(s.table.pockets()[2].captured(), &[BallId(0), BallId(2)]);
    }

    #[test]
    fn leaving_the_table_is_reported_separately() {
        let mut s = setup(&[(6, BallType::Solid, Vec2::new(-50.0, 300.0))]);
        let out = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        assert!(out.potted.is_empty());
        assert_eq!(out.off_table, vec![BallId(0)]);
        assert!(s.balls[0].potted);
        assert!(s.table.pockets().iter().all(|p| p.captured().is_empty()));
    }

    #[test]
    fn first_contact_comes_from_cue_ball_contacts() {
        let mut s = setup(&[
            (0, BallType::Cue, Vec2::new(400.0, 300.0)),
            (4, BallType::Solid, Vec2::new(500.0, 300.0)),
            (12, BallType::Striped, Vec2::new(600.0, 300.0)),
        ]);
        let cue = s.balls[0].body.unwrap();
        let stripe = s.balls[2].body.unwrap();
        let solid = s.balls[1].body.unwrap();
        // Object-object contacts do not count
        s.physics.queue_contact(solid, stripe);
        s.physics.queue_contact(stripe, cue);
        s.physics.step(1.0 / 60.0);

        let out = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap();
        assert_eq!(out.first_contact, Some(BallId(2)));
    }

    #[test]
    fn merge_keeps_earliest_contact() {
        let mut shot = ShotOutcome {
            first_contact: Some(BallId(3)),
            potted: vec![BallId(3)],
            ..ShotOutcome::default()
        };
        shot.merge(ShotOutcome {
            first_contact: Some(BallId(5)),
            potted: vec![BallId(0)],
            scratch: true,
            off_table: vec![BallId(7)],
        });
        assert_eq!(shot.first_contact, Some(BallId(3)));
        assert_eq!(shot.potted, vec![BallId(3), BallId(0)]);
        assert!(shot.scratch);
        assert_eq!(shot.removed().collect::<Vec<_>>(), vec![BallId(3), BallId(0), BallId(7)]);
    }

    #[test]
    fn stale_body_is_a_desync() {
        let table = Table::from_preset(&PoolConfig::eight_ball().unwrap().table);
        let corner = table.pockets()[0].pos;
        let mut s = setup(&[(1, BallType::Solid, corner)]);
        let body = s.balls[0].body.unwrap();
        s.physics.destroy_body(body).unwrap();
        let err = detect(&mut s.physics, &mut s.table, &mut s.balls, 0.5).unwrap_err();
        assert!(matches!(err, GameError::BallDesync { .. }));
    }
}
