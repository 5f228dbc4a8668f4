use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Opaque handle to a body owned by a [`PhysicsEngine`](crate::PhysicsEngine).
///
/// Handles are issued by the engine on creation and never reused within one
/// world, so a stale handle is always reported as invalid rather than aliasing
/// a newer body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// A game event communicated from Rust to the host page via a flat float buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}
