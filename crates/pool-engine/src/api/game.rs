use crate::api::types::GameEvent;
use crate::input::queue::InputQueue;
use crate::renderer::sink::RenderSink;

/// Configuration for the engine loop, provided by the game.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Upper bound on fixed steps run for one host frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Maximum number of tessellated vector vertices (default: 16384).
    pub max_vector_vertices: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_steps_per_frame: 10,
            max_events: 32,
            max_vector_vertices: 16384,
        }
    }
}

/// The core contract every game must fulfill.
///
/// The game owns its simulation world outright; the runner only feeds it input,
/// asks it to draw, and collects the events it emitted during the last update.
pub trait Game {
    /// Fatal fault type. Returning it from `update` halts the runner.
    type Error: std::error::Error;

    /// Return engine configuration. Called once when the runner is built.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// One fixed-step frame: consume input, step physics, apply rules.
    fn update(&mut self, input: &InputQueue) -> Result<(), Self::Error>;

    /// Read-only pass issuing draw calls back-to-front.
    fn render(&self, sink: &mut dyn RenderSink);

    /// Events emitted during the most recent `update`.
    fn events(&self) -> &[GameEvent] {
        &[]
    }
}
