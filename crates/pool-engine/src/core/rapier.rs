use std::collections::HashMap;
use std::sync::Mutex;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::api::types::BodyId;
use crate::core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, ContactPair, PhysicsEngine, PhysicsError,
};

// ---------------------------------------------------------------------------
// Conversion helpers: glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
            BodyType::KinematicPositionBased => RigidBodyType::KinematicPositionBased,
        }
    }
}

impl ColliderDesc {
    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }
}

/// Handle pair referencing Rapier internals for one body.
#[derive(Debug, Clone, Copy)]
struct RapierBody {
    body_handle: RigidBodyHandle,
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&rapier2d::prelude::ContactPair>,
    ) {
        if let Ok(mut guard) = self.collisions.lock() {
            guard.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &rapier2d::prelude::ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Rapier2D world with zero gravity, owned by exactly one game.
///
/// Bodies are addressed by [`BodyId`]; the id is also stored in the Rapier
/// body's `user_data` so collision events resolve back to ids.
pub struct PhysicsWorld {
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
    handles: HashMap<BodyId, RapierBody>,
    next_id: u32,
    substeps: u32,
    contacts: Vec<ContactPair>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
            handles: HashMap::new(),
            next_id: 1,
            substeps: 1,
            contacts: Vec::new(),
        }
    }

    /// Split every `step(dt)` into `substeps` pipeline steps of `dt / substeps`.
    /// Pool balls want ~240Hz collision resolution (4 substeps at 60Hz).
    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps.max(1);
        self
    }

    fn rigid_body(&self, body: BodyId) -> Result<&RigidBody, PhysicsError> {
        self.handles
            .get(&body)
            .and_then(|h| self.bodies.get(h.body_handle))
            .ok_or(PhysicsError::InvalidHandle(body))
    }

    fn rigid_body_mut(&mut self, body: BodyId) -> Result<&mut RigidBody, PhysicsError> {
        let handle = self
            .handles
            .get(&body)
            .ok_or(PhysicsError::InvalidHandle(body))?
            .body_handle;
        self.bodies
            .get_mut(handle)
            .ok_or(PhysicsError::InvalidHandle(body))
    }

    fn collider_to_body(&self, collider_handle: ColliderHandle) -> Option<BodyId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(BodyId(body.user_data as u32))
    }

    fn drain_contacts(&mut self) {
        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Stopped events for removed colliders cannot be resolved; skip them.
            if let (Some(a), Some(b)) = (self.collider_to_body(h1), self.collider_to_body(h2)) {
                self.contacts.push(ContactPair {
                    body_a: a,
                    body_b: b,
                    started,
                });
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for PhysicsWorld {
    fn create_body(&mut self, desc: &BodyDesc, material: ColliderMaterial) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;

        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .rotation(desc.rotation)
            .gravity_scale(0.0)
            .ccd_enabled(desc.ccd)
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .user_data(id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .sensor(desc.sensor)
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        self.colliders
            .insert_with_parent(collider, body_handle, &mut self.bodies);

        self.handles.insert(id, RapierBody { body_handle });
        id
    }

    fn destroy_body(&mut self, body: BodyId) -> Result<(), PhysicsError> {
        let handle = self
            .handles
            .remove(&body)
            .ok_or(PhysicsError::InvalidHandle(body))?;
        self.bodies
            .remove(
                handle.body_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .map(|_| ())
            .ok_or(PhysicsError::InvalidHandle(body))
    }

    fn set_position(&mut self, body: BodyId, pos: Vec2) -> Result<(), PhysicsError> {
        self.rigid_body_mut(body)?
            .set_translation(vec2_to_na(pos), true);
        Ok(())
    }

    fn set_velocity(&mut self, body: BodyId, vel: Vec2) -> Result<(), PhysicsError> {
        self.rigid_body_mut(body)?.set_linvel(vec2_to_na(vel), true);
        Ok(())
    }

    fn apply_impulse(&mut self, body: BodyId, impulse: Vec2) -> Result<(), PhysicsError> {
        self.rigid_body_mut(body)?
            .apply_impulse(vec2_to_na(impulse), true);
        Ok(())
    }

    fn step(&mut self, dt: f32) {
        self.contacts.clear();
        self.integration_parameters.dt = dt / self.substeps as f32;
        let gravity = nalgebra::Vector2::zeros();

        for _ in 0..self.substeps {
            self.physics_pipeline.step(
                &gravity,
                &self.integration_parameters,
                &mut self.island_manager,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &self.event_collector,
            );
            self.drain_contacts();
        }
    }

    fn position(&self, body: BodyId) -> Result<Vec2, PhysicsError> {
        Ok(na_to_vec2(self.rigid_body(body)?.translation()))
    }

    fn velocity(&self, body: BodyId) -> Result<Vec2, PhysicsError> {
        Ok(na_to_vec2(self.rigid_body(body)?.linvel()))
    }

    fn contacts(&self) -> &[ContactPair] {
        &self.contacts
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
