//! Copies post-step body state into the render-side entities.

use pool_engine::PhysicsEngine;

use crate::entities::{Ball, Cue};
use crate::error::GameError;

/// Overwrite render state from the physics world.
///
/// Live balls take position and velocity from their bodies; a cue in flight
/// takes position only, its angle stays input-driven. Reads physics, never
/// writes it, so calling this twice without a step in between is a no-op.
pub fn sync<P: PhysicsEngine + ?Sized>(
    physics: &P,
    balls: &mut [Ball],
    cues: &mut [Cue],
) -> Result<(), GameError> {
    for ball in balls.iter_mut().filter(|b| !b.potted) {
        let Some(body) = ball.body else {
            continue;
        };
        ball.pos = physics.position(body).map_err(GameError::ball(ball.id))?;
        ball.vel = physics.velocity(body).map_err(GameError::ball(ball.id))?;
    }

    for cue in cues.iter_mut() {
        if let Some(body) = cue.body {
            cue.pos = physics.position(body).map_err(GameError::CueDesync)?;
        }
    }

    Ok(())
}
