pub mod api;
pub mod core;
pub mod input;
pub mod renderer;
#[cfg(feature = "vectors")]
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineConfig, Game};
pub use api::types::{BodyId, GameEvent};
pub use core::physics::{
    BodyDesc, BodyType, ColliderDesc, ColliderMaterial, ContactPair, PhysicsEngine, PhysicsError,
};
pub use core::time::FrameClock;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::color::VectorColor;
pub use renderer::sink::{DrawCommand, DrawList, RenderSink};

#[cfg(feature = "physics")]
pub use core::rapier::PhysicsWorld;

#[cfg(feature = "vectors")]
pub use systems::vector::{TextLabel, VectorState, VectorVertex};
