//! Pool game: owns the physics world, the rack and the turn state, and runs
//! the per-frame pipeline input → cue → step → sync → detect → turn → win.

use glam::Vec2;
use pool_engine::{
    BodyDesc, BodyId, ColliderDesc, ColliderMaterial, EngineConfig, Game, GameEvent, InputEvent,
    InputQueue, PhysicsEngine, RenderSink,
};

use crate::config::PoolConfig;
use crate::cue::{CueController, ShotRequest};
use crate::detector::{detect, ShotOutcome};
use crate::entities::{Ball, BallId, Cue, PlayerId};
use crate::error::GameError;
use crate::render::draw_scene;
use crate::sync::sync;
use crate::table::{Table, Wall};
use crate::turn::{GameState, Resolution, TurnPhase};

#[cfg(feature = "physics")]
use pool_engine::PhysicsWorld;

/// Custom event kinds from the UI
pub mod events {
    /// Re-rack the current preset.
    pub const RESET: u32 = 1;
    /// Switch preset: `a == 0` standard 8-ball, `a == 1` kids table.
    pub const LOAD_PRESET: u32 = 2;
}

/// Game event kinds to the UI
pub mod game_events {
    /// `a`: object balls still on the table.
    pub const BALLS_REMAINING: f32 = 1.0;
    /// `a`: ball number, `b`: pocket index or -1 when off the table, `c`: ball type code.
    pub const BALL_POTTED: f32 = 2.0;
    /// `a`: foul code, `b`: offending player.
    pub const FOUL: f32 = 3.0;
    /// `a`: player now to shoot.
    pub const TURN_CHANGED: f32 = 4.0;
    /// `a`: player, `b`: that player's group code.
    pub const GROUPS_ASSIGNED: f32 = 5.0;
    /// `a`: winning player.
    pub const WINNER: f32 = 6.0;
}

pub struct PoolGame<P: PhysicsEngine> {
    config: PoolConfig,
    physics: P,
    table: Table,
    balls: Vec<Ball>,
    cues: [Cue; 2],
    state: GameState,
    controller: CueController,
    /// Cushion and backstop bodies.
    walls: Vec<BodyId>,
    /// Everything detected since the last resolution.
    shot: ShotOutcome,
    /// Steps the current shot's impulse has been through.
    shot_frames: u32,
    events: Vec<GameEvent>,
}

#[cfg(feature = "physics")]
impl PoolGame<PhysicsWorld> {
    /// Standard 8-ball on a Rapier world.
    pub fn eight_ball() -> Result<Self, GameError> {
        Self::with_world(PoolConfig::eight_ball()?)
    }

    /// Kids table on a Rapier world.
    pub fn kids() -> Result<Self, GameError> {
        Self::with_world(PoolConfig::kids()?)
    }

    /// Build from a preset JSON string.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Self::with_world(PoolConfig::from_json(json)?)
    }

    pub fn with_world(config: PoolConfig) -> Result<Self, GameError> {
        let world = PhysicsWorld::new().with_substeps(config.physics.substeps);
        Self::new(config, world)
    }
}

impl<P: PhysicsEngine> PoolGame<P> {
    /// Validate `config`, then build the table and rack inside `physics`.
    pub fn new(config: PoolConfig, physics: P) -> Result<Self, GameError> {
        config.validate()?;
        let table = Table::from_preset(&config.table);
        let controller = CueController::new(config.rules.local_player);

        let mut game = Self {
            config,
            physics,
            table,
            balls: Vec::new(),
            cues: [Cue::new(PlayerId::ONE), Cue::new(PlayerId::TWO)],
            state: GameState::new(),
            controller,
            walls: Vec::new(),
            shot: ShotOutcome::default(),
            shot_frames: 0,
            events: Vec::new(),
        };
        game.build_walls();
        game.rack();
        log::info!(
            "{}: racked {} balls on a {}-pocket table",
            game.config.name,
            game.balls.len(),
            game.table.pockets().len()
        );
        Ok(game)
    }

    fn wall_material(&self) -> ColliderMaterial {
        ColliderMaterial {
            restitution: self.config.physics.cushion_restitution,
            friction: self.config.physics.cushion_friction,
            density: 1.0,
        }
    }

    fn ball_material(&self) -> ColliderMaterial {
        ColliderMaterial {
            restitution: self.config.physics.restitution,
            friction: self.config.physics.friction,
            density: self.config.physics.density,
        }
    }

    /// Cushions with gaps at the pocket mouths, plus backstops behind them.
    fn build_walls(&mut self) {
        let material = self.wall_material();
        let mut walls: Vec<Wall> = self.table.cushions();
        walls.extend(self.table.backstops());
        for wall in walls {
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: wall.half.x,
                half_height: wall.half.y,
            })
            .with_position(wall.center);
            self.walls.push(self.physics.create_body(&desc, material));
        }
    }

    fn ball_body(&mut self, pos: Vec2) -> BodyId {
        let tuning = &self.config.physics;
        let desc = BodyDesc::dynamic(ColliderDesc::Ball {
            radius: self.config.rack.ball_radius,
        })
        .with_position(pos)
        .with_linear_damping(tuning.linear_damping)
        .with_angular_damping(tuning.angular_damping)
        .with_ccd(true);
        let material = self.ball_material();
        self.physics.create_body(&desc, material)
    }

    /// Cue ball as id 0, then the object balls in rack slot order. No
    /// velocity is applied.
    fn rack(&mut self) {
        let radius = self.config.rack.ball_radius;
        let spot = self.config.cue_spot();
        let mut cue_ball = Ball::new(BallId::CUE, &self.config.cue_spec(), radius, spot);
        cue_ball.body = Some(self.ball_body(spot));
        self.balls.push(cue_ball);

        let specs = self.config.rack.balls.clone();
        for (i, (spec, pos)) in specs.iter().zip(self.config.rack_layout()).enumerate() {
            let mut ball = Ball::new(BallId(i as u16 + 1), spec, radius, pos);
            ball.body = Some(self.ball_body(pos));
            self.balls.push(ball);
        }
    }

    /// Release every ball and stick body and forget the current game.
    fn clear_rack(&mut self) -> Result<(), GameError> {
        for ball in &mut self.balls {
            if let Some(body) = ball.body.take() {
                self.physics
                    .destroy_body(body)
                    .map_err(GameError::ball(ball.id))?;
            }
        }
        for cue in &mut self.cues {
            if let Some(body) = cue.body.take() {
                self.physics.destroy_body(body).map_err(GameError::CueDesync)?;
            }
            *cue = Cue::new(cue.owner);
        }
        self.balls.clear();
        self.table.clear_pockets();
        self.state = GameState::new();
        self.shot = ShotOutcome::default();
        self.shot_frames = 0;
        Ok(())
    }

    /// Tear down the rack and start over with the current preset.
    pub fn reset(&mut self) -> Result<(), GameError> {
        self.clear_rack()?;
        self.rack();
        log::info!("{}: re-racked", self.config.name);
        Ok(())
    }

    /// Swap to another preset, rebuilding the table.
    pub fn load(&mut self, config: PoolConfig) -> Result<(), GameError> {
        config.validate()?;
        self.clear_rack()?;
        for body in self.walls.drain(..) {
            self.physics
                .destroy_body(body)
                .map_err(GameError::TableDesync)?;
        }

        self.table = Table::from_preset(&config.table);
        self.controller = CueController::new(config.rules.local_player);
        self.config = config;
        self.build_walls();
        self.rack();
        log::info!("loaded preset {}", self.config.name);
        Ok(())
    }

    // ---- Accessors ----

    pub fn pool_config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.get(id.index())
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }

    /// Object balls still in play.
    pub fn balls_remaining(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_cue() && !b.potted).count()
    }

    fn emit(&mut self, kind: f32, a: f32, b: f32, c: f32) {
        self.events.push(GameEvent::new(kind, a, b, c));
    }

    // ---- Frame pipeline ----

    /// Run one fixed-step frame.
    pub fn frame(&mut self, input: &InputQueue) -> Result<(), GameError> {
        self.events.clear();

        for event in input.iter() {
            if let InputEvent::Custom { kind, a, .. } = *event {
                match kind {
                    events::RESET => return self.reset(),
                    events::LOAD_PRESET => {
                        let config = if a >= 1.0 {
                            PoolConfig::kids()?
                        } else {
                            PoolConfig::eight_ball()?
                        };
                        return self.load(config);
                    }
                    _ => {}
                }
            }
        }

        if self.state.phase == TurnPhase::GameOver {
            return Ok(());
        }

        // Cue controller
        let cue_ball = self.balls[BallId::CUE.index()].pos;
        let radius = self.config.rack.ball_radius;
        let mut request = None;
        for event in input.iter() {
            if let Some(shot) = self.controller.handle(
                event,
                &self.state,
                &mut self.cues,
                cue_ball,
                radius,
                &self.config.rules,
            ) {
                request = Some(shot);
            }
        }
        if let Some(shot) = request {
            self.fire(shot)?;
        }

        self.physics.step(self.config.physics.fixed_dt);
        sync(&self.physics, &mut self.balls, &mut self.cues)?;

        let outcome = detect(
            &mut self.physics,
            &mut self.table,
            &mut self.balls,
            self.config.rules.containment_factor,
        )?;
        self.report_pots(&outcome);
        self.shot.merge(outcome);

        self.retire_cue_bodies()?;
        self.advance();

        let remaining = self.balls_remaining() as f32;
        self.emit(game_events::BALLS_REMAINING, remaining, 0.0, 0.0);
        Ok(())
    }

    /// Start a shot for `player`. Returns `Ok(false)` when the shot is refused
    /// (wrong player, or a shot is already running).
    pub fn take_shot(&mut self, player: PlayerId, impulse: Vec2) -> Result<bool, GameError> {
        let cue_ball = self.balls[BallId::CUE.index()].pos;
        let dir = impulse.normalize_or_zero();
        let angle = dir.y.atan2(dir.x);
        let tip = cue_ball - dir * (self.config.rack.ball_radius + 2.0);
        let fired = self.fire(ShotRequest {
            player,
            impulse,
            tip,
            angle,
        })?;
        if fired {
            // Fired between frames: the next frame's step carries the impulse
            self.shot_frames = 1;
        }
        Ok(fired)
    }

    fn fire(&mut self, shot: ShotRequest) -> Result<bool, GameError> {
        if !self.state.begin_shot(shot.player) {
            log::debug!("shot from {} ignored in {:?}", shot.player, self.state.phase);
            return Ok(false);
        }
        let cue_ball = &self.balls[BallId::CUE.index()];
        let Some(body) = cue_ball.body.filter(|_| !cue_ball.potted) else {
            return Err(GameError::MissingCueBall);
        };
        self.physics
            .apply_impulse(body, shot.impulse)
            .map_err(GameError::ball(BallId::CUE))?;

        // The stick stays in the world briefly as a sensor at the tip
        let desc = BodyDesc::kinematic(ColliderDesc::Cuboid {
            half_width: 2.0,
            half_height: 2.5,
        })
        .with_position(shot.tip)
        .with_rotation(shot.angle)
        .with_sensor(true);
        let stick = self.physics.create_body(&desc, ColliderMaterial::default());
        let cue = &mut self.cues[shot.player.index()];
        if let Some(old) = cue.body.take() {
            self.physics.destroy_body(old).map_err(GameError::CueDesync)?;
        }
        cue.angle = shot.angle;
        cue.pos = shot.tip;
        cue.body = Some(stick);
        cue.flight_frames = 0;

        self.shot_frames = 0;
        log::info!("{} shoots, impulse {:?}", shot.player, shot.impulse);
        Ok(true)
    }

    /// Drop stick bodies once the cue ball has left the tip, or on timeout.
    fn retire_cue_bodies(&mut self) -> Result<(), GameError> {
        let cue_ball = &self.balls[BallId::CUE.index()];
        let clear = cue_ball.potted || cue_ball.body.is_none();
        let (ball_pos, radius) = (cue_ball.pos, cue_ball.radius);
        let timeout = self.config.rules.cue_body_timeout_frames;

        for cue in &mut self.cues {
            let Some(body) = cue.body else {
                continue;
            };
            cue.flight_frames += 1;
            let away = ball_pos.distance(cue.pos) > radius * 2.0 + 2.0;
            if clear || away || cue.flight_frames >= timeout {
                self.physics.destroy_body(body).map_err(GameError::CueDesync)?;
                cue.body = None;
            }
        }
        Ok(())
    }

    fn report_pots(&mut self, outcome: &ShotOutcome) {
        let mut pots = Vec::new();
        for id in &outcome.potted {
            let pocket = self
                .table
                .pockets()
                .iter()
                .position(|p| p.captured().contains(id))
                .map_or(-1.0, |i| i as f32);
            pots.push((*id, pocket));
        }
        for id in &outcome.off_table {
            pots.push((*id, -1.0));
        }
        for (id, pocket) in pots {
            if let Some(ball) = self.balls.get(id.index()) {
                let (number, code) = (ball.number as f32, ball.ball_type.code());
                self.emit(game_events::BALL_POTTED, number, pocket, code);
            }
        }
    }

    /// One phase transition at most.
    fn advance(&mut self) {
        match self.state.phase {
            TurnPhase::Shooting => {
                if self.shot_frames > 0 {
                    self.state.launch();
                }
            }
            TurnPhase::Settling => {
                let dt = self.config.physics.fixed_dt;
                self.state.settle(&self.balls, dt, self.config.rules.settle_epsilon);
            }
            TurnPhase::Resolving => {
                let outcome = std::mem::take(&mut self.shot);
                let res = self.state.resolve(&self.balls, &outcome);
                self.apply_resolution(&res);
            }
            TurnPhase::WaitingForAim | TurnPhase::GameOver => {}
        }
        if self.state.shot_in_progress {
            self.shot_frames += 1;
        }
    }

    fn apply_resolution(&mut self, res: &Resolution) {
        if res.respot_cue {
            self.respot_cue_ball();
        }
        if let Some(foul) = res.foul {
            log::warn!("foul by {}: {}", res.shooter, foul);
            self.emit(game_events::FOUL, foul.code(), res.shooter.0 as f32, 0.0);
        }
        if let Some(group) = res.assigned {
            log::info!("{} takes {}", res.shooter, group.label());
            self.emit(game_events::GROUPS_ASSIGNED, res.shooter.0 as f32, group.code(), 0.0);
        }
        if let Some(winner) = res.winner {
            self.emit(game_events::WINNER, winner.0 as f32, 0.0, 0.0);
        } else {
            self.emit(game_events::TURN_CHANGED, res.next.0 as f32, 0.0, 0.0);
        }
    }

    /// Put the cue ball back on its spot, at rest.
    fn respot_cue_ball(&mut self) {
        let spot = self.config.cue_spot();
        let body = self.ball_body(spot);
        let ball = &mut self.balls[BallId::CUE.index()];
        ball.potted = false;
        ball.body = Some(body);
        ball.pos = spot;
        ball.vel = Vec2::ZERO;
        log::info!("cue ball respotted at {:?}", spot);
    }
}

impl<P: PhysicsEngine> Game for PoolGame<P> {
    type Error = GameError;

    fn config(&self) -> EngineConfig {
        let world = self.config.world_size();
        EngineConfig {
            fixed_dt: self.config.physics.fixed_dt,
            world_width: world.x,
            world_height: world.y,
            max_vector_vertices: 65536,
            ..EngineConfig::default()
        }
    }

    fn update(&mut self, input: &InputQueue) -> Result<(), GameError> {
        self.frame(input)
    }

    fn render(&self, sink: &mut dyn RenderSink) {
        draw_scene(sink, &self.table, &self.balls, &self.cues, &self.state);
    }

    fn events(&self) -> &[GameEvent] {
        &self.events
    }
}
