//! Physics boundary: the body/step/query contract the game layer consumes.
//!
//! The game never talks to a concrete integrator. It owns some `P: PhysicsEngine`
//! (the Rapier-backed [`PhysicsWorld`](crate::PhysicsWorld) in production, a
//! scripted double in tests) and addresses bodies only through [`BodyId`].

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::types::BodyId;

/// Errors reported by a physics engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// The handle does not name a live body in this world.
    #[error("invalid body handle {0:?}")]
    InvalidHandle(BodyId),
}

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    Dynamic,
    Fixed,
    /// Moved only by `set_position`; pushes dynamic bodies but is never pushed.
    KinematicPositionBased,
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub body_type: BodyType,
    pub position: Vec2,
    pub rotation: f32,
    pub ccd: bool,
    pub sensor: bool,
    pub collider: ColliderDesc,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BodyDesc {
    fn with_type(body_type: BodyType, collider: ColliderDesc) -> Self {
        Self {
            body_type,
            position: Vec2::ZERO,
            rotation: 0.0,
            ccd: false,
            sensor: false,
            collider,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    /// Create a dynamic body description with the given collider shape.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self::with_type(BodyType::Dynamic, collider)
    }

    /// Create a fixed (static) body description with the given collider shape.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self::with_type(BodyType::Fixed, collider)
    }

    /// Create a kinematic body that only moves when positioned explicitly.
    pub fn kinematic(collider: ColliderDesc) -> Self {
        Self::with_type(BodyType::KinematicPositionBased, collider)
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Sensors report contacts but never exert contact forces.
    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set the linear damping (velocity decay). Higher values slow the body faster.
    /// This is how table felt friction is modelled.
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Set the angular damping (rotation decay).
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.angular_damping = damping;
        self
    }
}

/// A contact event between two bodies, produced by the most recent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// `true` when the contact just started, `false` when it ended.
    pub started: bool,
}

impl ContactPair {
    /// If `body` takes part in this contact, return the other body.
    pub fn other(&self, body: BodyId) -> Option<BodyId> {
        if self.body_a == body {
            Some(self.body_b)
        } else if self.body_b == body {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// The integrator contract consumed by the game layer.
///
/// Gravity is always zero: the table is viewed top-down. A step is atomic; all
/// queries between two `step` calls observe the same snapshot.
pub trait PhysicsEngine {
    /// Create a body with its single collider. The body starts at rest.
    fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> BodyId;

    /// Remove a body and its collider from the simulation.
    fn destroy_body(&mut self, body: BodyId) -> Result<(), PhysicsError>;

    /// Teleport a body. Kinematic bodies are moved to the new pose for the next step.
    fn set_position(&mut self, body: BodyId, pos: Vec2) -> Result<(), PhysicsError>;

    /// Overwrite the linear velocity of a body.
    fn set_velocity(&mut self, body: BodyId, vel: Vec2) -> Result<(), PhysicsError>;

    /// Apply an instantaneous impulse to a body.
    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) -> Result<(), PhysicsError>;

    /// Advance the simulation by `dt` seconds and replace the contact list.
    fn step(&mut self, dt: f32);

    fn position(&self, body: BodyId) -> Result<Vec2, PhysicsError>;

    fn velocity(&self, body: BodyId) -> Result<Vec2, PhysicsError>;

    /// Contacts started or stopped during the most recent `step`, in engine order.
    fn contacts(&self) -> &[ContactPair];

    /// Number of live bodies.
    fn body_count(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_pattern() {
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 5.0 })
            .with_position(Vec2::new(10.0, 20.0))
            .with_rotation(0.5)
            .with_linear_damping(1.75)
            .with_ccd(true);

        assert_eq!(desc.body_type, BodyType::Dynamic);
        assert_eq!(desc.position, Vec2::new(10.0, 20.0));
        assert!((desc.rotation - 0.5).abs() < 0.001);
        assert!((desc.linear_damping - 1.75).abs() < 0.001);
        assert!(desc.ccd);
        assert!(!desc.sensor);
    }

    #[test]
    fn kinematic_sensor_desc() {
        let desc = BodyDesc::kinematic(ColliderDesc::Cuboid {
            half_width: 90.0,
            half_height: 2.5,
        })
        .with_sensor(true);
        assert_eq!(desc.body_type, BodyType::KinematicPositionBased);
        assert!(desc.sensor);
    }

    #[test]
    fn collider_material_defaults() {
        let mat = ColliderMaterial::default();
        assert!((mat.restitution - 0.3).abs() < 0.001);
        assert!((mat.friction - 0.5).abs() < 0.001);
        assert!((mat.density - 1.0).abs() < 0.001);
    }

    #[test]
    fn contact_other_side() {
        let pair = ContactPair {
            body_a: BodyId(3),
            body_b: BodyId(7),
            started: true,
        };
        assert_eq!(pair.other(BodyId(3)), Some(BodyId(7)));
        assert_eq!(pair.other(BodyId(7)), Some(BodyId(3)));
        assert_eq!(pair.other(BodyId(1)), None);
    }
}
