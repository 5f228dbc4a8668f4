/// Fixed timestep frame clock.
///
/// Converts variable host frame deltas into a whole number of fixed ticks and
/// counts the ticks issued so far. Game logic only ever sees fixed ticks, so a
/// "frame" in the rules layer always means one tick of `dt`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    dt: f32,
    max_steps: u32,
    accumulator: f32,
    ticks: u64,
}

impl FrameClock {
    pub fn new(dt: f32, max_steps: u32) -> Self {
        Self {
            dt,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            ticks: 0,
        }
    }

    /// Add host frame time. Returns the number of fixed ticks to run now.
    ///
    /// Backlog beyond `max_steps` ticks is dropped so a stalled tab cannot
    /// trigger a spiral of catch-up work.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        self.ticks += steps as u64;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Total fixed ticks issued since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
