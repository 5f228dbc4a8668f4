use pool_engine::{
    EngineConfig, FrameClock, Game, GameEvent, InputEvent, InputQueue, VectorState,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export generic
/// structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    input: InputQueue,
    vectors: VectorState,
    clock: FrameClock,
    config: EngineConfig,
    /// Set once `update` returns an error; the game is frozen from then on.
    halted: bool,
    /// Events from every fixed step of the last tick, in order.
    events: Vec<GameEvent>,
    labels_json: String,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let clock = FrameClock::new(config.fixed_dt, config.max_steps_per_frame);
        let vectors = VectorState::with_capacity(config.max_vector_vertices);
        let events = Vec::with_capacity(config.max_events);

        Self {
            game,
            input: InputQueue::new(),
            vectors,
            clock,
            config,
            halted: false,
            events,
            labels_json: String::from("[]"),
        }
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: fixed-step updates, then a fresh render pass.
    pub fn tick(&mut self, dt: f32) {
        if self.halted {
            return;
        }

        self.events.clear();
        let steps = self.clock.accumulate(dt);
        for step in 0..steps {
            if let Err(e) = self.game.update(&self.input) {
                log::error!("game halted: {}", e);
                self.halted = true;
                break;
            }
            self.collect_events();

            // Input is consumed by the first step only
            if step == 0 {
                self.input.drain();
            }
        }

        self.vectors.clear();
        self.game.render(&mut self.vectors);
        self.labels_json = match serde_json::to_string(self.vectors.labels()) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("failed to encode text labels: {}", e);
                String::from("[]")
            }
        };
    }

    fn collect_events(&mut self) {
        let room = self.config.max_events.saturating_sub(self.events.len());
        let events = self.game.events();
        if events.len() > room {
            log::warn!("event buffer full, dropping {} events", events.len() - room);
        }
        self.events.extend(events.iter().take(room).copied());
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.config.max_vector_vertices as u32
    }

    pub fn labels_json(&self) -> String {
        self.labels_json.clone()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.events.len() as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }
}
