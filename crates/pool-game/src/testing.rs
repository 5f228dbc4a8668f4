//! Scripted physics double for rules tests.
//!
//! Bodies move in straight lines with per-body damping and never collide.
//! Contacts are injected by the test and reported on the next step. Every body
//! has unit mass, so an impulse is a velocity change.

use std::collections::BTreeMap;

use glam::Vec2;
use pool_engine::{
    BodyDesc, BodyId, BodyType, ColliderMaterial, ContactPair, PhysicsEngine, PhysicsError,
};

#[derive(Debug, Clone)]
struct ScriptedBody {
    body_type: BodyType,
    pos: Vec2,
    vel: Vec2,
    damping: f32,
}

#[derive(Debug, Default)]
pub struct ScriptedPhysics {
    bodies: BTreeMap<BodyId, ScriptedBody>,
    next_id: u32,
    contacts: Vec<ContactPair>,
    queued_contacts: Vec<ContactPair>,
    pub steps: u32,
}

impl ScriptedPhysics {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Report a started contact between `a` and `b` on the next step.
    pub fn queue_contact(&mut self, a: BodyId, b: BodyId) {
        self.queued_contacts.push(ContactPair {
            body_a: a,
            body_b: b,
            started: true,
        });
    }

    /// Stop every body dead.
    pub fn halt_all(&mut self) {
        for body in self.bodies.values_mut() {
            body.vel = Vec2::ZERO;
        }
    }

    pub fn is_alive(&self, body: BodyId) -> bool {
        self.bodies.contains_key(&body)
    }

    pub fn body_type(&self, body: BodyId) -> Option<BodyType> {
        self.bodies.get(&body).map(|b| b.body_type)
    }

    fn get_mut(&mut self, body: BodyId) -> Result<&mut ScriptedBody, PhysicsError> {
        self.bodies
            .get_mut(&body)
            .ok_or(PhysicsError::InvalidHandle(body))
    }

    fn get(&self, body: BodyId) -> Result<&ScriptedBody, PhysicsError> {
        self.bodies.get(&body).ok_or(PhysicsError::InvalidHandle(body))
    }
}

impl PhysicsEngine for ScriptedPhysics {
    fn create_body(&mut self, desc: &BodyDesc, _material: ColliderMaterial) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            id,
            ScriptedBody {
                body_type: desc.body_type,
                pos: desc.position,
                vel: Vec2::ZERO,
                damping: desc.linear_damping,
            },
        );
        id
    }

    fn destroy_body(&mut self, body: BodyId) -> Result<(), PhysicsError> {
        self.bodies
            .remove(&body)
            .map(|_| ())
            .ok_or(PhysicsError::InvalidHandle(body))
    }

    fn set_position(&mut self, body: BodyId, pos: Vec2) -> Result<(), PhysicsError> {
        self.get_mut(body)?.pos = pos;
        Ok(())
    }

    fn set_velocity(&mut self, body: BodyId, vel: Vec2) -> Result<(), PhysicsError> {
        self.get_mut(body)?.vel = vel;
        Ok(())
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) -> Result<(), PhysicsError> {
        let b = self.get_mut(body)?;
        if b.body_type == BodyType::Dynamic {
            b.vel += impulse;
        }
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        for body in self.bodies.values_mut() {
            if body.body_type != BodyType::Dynamic {
                continue;
            }
            body.pos += body.vel * dt;
            body.vel /= 1.0 + dt * body.damping;
        }
        self.contacts = std::mem::take(&mut self.queued_contacts);
    }

    fn position(&self, body: BodyId) -> Result<Vec2, PhysicsError> {
        Ok(self.get(body)?.pos)
    }

    fn velocity(&self, body: BodyId) -> Result<Vec2, PhysicsError> {
        Ok(self.get(body)?.vel)
    }

    fn contacts(&self) -> &[ContactPair] {
        &self.contacts
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
