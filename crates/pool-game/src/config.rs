//! Table, rack, rules and physics presets.
//!
//! Variants (standard 8-ball, the 28-ball kids table) are plain data loaded
//! from JSON. Everything is validated once at startup; a bad preset never
//! reaches the physics world.

use glam::Vec2;
use pool_engine::VectorColor;
use serde::{Deserialize, Serialize};

use crate::balls::{rack_positions, BallSpec, BallType};
use crate::entities::PlayerId;
use crate::error::ConfigError;
use crate::table::Table;

const EIGHT_BALL_JSON: &str = include_str!("../presets/eight_ball.json");
const KIDS_JSON: &str = include_str!("../presets/kids.json");

/// Complete description of one game variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub name: String,
    pub table: TablePreset,
    pub rack: RackPreset,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub physics: PhysicsTuning,
}

/// Table geometry in world units.
///
/// The table's outer edge sits `margin` in from the world origin; cushions run
/// `rail` deep along every edge, broken by `pocket_gap` at each pocket mouth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreset {
    pub width: f32,
    pub height: f32,
    /// Free space around the table for drawing the cue stick.
    pub margin: f32,
    pub rail: f32,
    pub pocket_gap: f32,
    /// Capture radius of every pocket.
    pub pocket_radius: f32,
    /// Corner pocket inset from the table edge, as a fraction of `rail`.
    pub corner_inset: f32,
    /// Side pocket inset from the long edges, as a fraction of `rail`.
    pub side_inset: f32,
    /// Adds the two midpoint pockets on the long edges.
    pub side_pockets: bool,
    #[serde(default = "default_felt")]
    pub felt: VectorColor,
    #[serde(default = "default_rail_color")]
    pub rail_color: VectorColor,
}

fn default_felt() -> VectorColor {
    VectorColor::rgb(0.05, 0.4, 0.2)
}

fn default_rail_color() -> VectorColor {
    VectorColor::new(0.12, 0.06, 0.02, 1.0)
}

/// Ball set and where it starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackPreset {
    pub ball_radius: f32,
    /// Rack apex as a fraction of table width/height.
    pub apex: [f32; 2],
    /// Cue ball start and respot position, as a fraction of table width/height.
    pub cue_spot: [f32; 2],
    #[serde(default)]
    pub cue_color: Option<VectorColor>,
    /// Object balls in rack slot order.
    pub balls: Vec<BallSpec>,
}

/// Turn and shot tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// A ball counts as stopped when it moves at most this far in one frame.
    pub settle_epsilon: f32,
    /// Fraction of a ball's radius that must be inside the capture circle.
    pub containment_factor: f32,
    pub max_pullback: f32,
    /// Impulse per unit of pullback.
    pub power_per_unit: f32,
    pub min_power: f32,
    pub max_power: f32,
    /// Frames the cue stick body may stay in the world after a shot.
    pub cue_body_timeout_frames: u32,
    /// Player accepted from this input device. `None` means hot-seat.
    pub local_player: Option<PlayerId>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            settle_epsilon: 0.05,
            containment_factor: 0.5,
            max_pullback: 150.0,
            power_per_unit: 48.0,
            min_power: 20.0,
            max_power: 7200.0,
            cue_body_timeout_frames: 30,
            local_player: None,
        }
    }
}

/// Body and material parameters handed to the physics world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub fixed_dt: f32,
    pub substeps: u32,
    /// Felt friction (higher = stops faster).
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Very low density so impulses map to brisk speeds.
    pub density: f32,
    pub cushion_restitution: f32,
    pub cushion_friction: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            substeps: 4,
            linear_damping: 1.75,
            angular_damping: 1.0,
            restitution: 0.95,
            friction: 0.2,
            density: 0.01,
            cushion_restitution: 0.95,
            cushion_friction: 0.2,
        }
    }
}

impl PoolConfig {
    /// Parse and validate a preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PoolConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Standard 8-ball: 15 object balls, six pockets.
    pub fn eight_ball() -> Result<Self, ConfigError> {
        Self::from_json(EIGHT_BALL_JSON)
    }

    /// Kids table: 28 balls in eight colors, four corner pockets.
    pub fn kids() -> Result<Self, ConfigError> {
        Self::from_json(KIDS_JSON)
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.table.width + 2.0 * self.table.margin,
            self.table.height + 2.0 * self.table.margin,
        )
    }

    /// Table-relative fraction to world position.
    pub fn table_point(&self, fraction: [f32; 2]) -> Vec2 {
        Vec2::new(
            self.table.margin + fraction[0] * self.table.width,
            self.table.margin + fraction[1] * self.table.height,
        )
    }

    pub fn cue_spot(&self) -> Vec2 {
        self.table_point(self.rack.cue_spot)
    }

    pub fn cue_spec(&self) -> BallSpec {
        BallSpec {
            number: 0,
            ball_type: BallType::Cue,
            color: self.rack.cue_color,
        }
    }

    /// World positions of the racked object balls, in slot order.
    pub fn rack_layout(&self) -> Vec<Vec2> {
        rack_positions(
            self.table_point(self.rack.apex),
            self.rack.ball_radius,
            self.rack.balls.len(),
        )
    }

    /// Check geometry, rack contents and rule ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.table;
        if !(t.width > 0.0 && t.height > 0.0) {
            return Err(ConfigError::EmptyTable {
                width: t.width,
                height: t.height,
            });
        }
        positive("table.rail", t.rail)?;
        positive("table.pocket_radius", t.pocket_radius)?;
        positive("rack.ball_radius", self.rack.ball_radius)?;
        positive("physics.fixed_dt", self.physics.fixed_dt)?;
        if t.margin < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "table.margin",
                value: t.margin,
            });
        }
        if t.width <= 2.0 * t.rail || t.height <= 2.0 * t.rail {
            return Err(ConfigError::EmptyTable {
                width: t.width - 2.0 * t.rail,
                height: t.height - 2.0 * t.rail,
            });
        }

        let table = Table::from_preset(t);
        let pockets = table.pockets();
        for (i, a) in pockets.iter().enumerate() {
            if !table.bounds.contains(a.pos) {
                return Err(ConfigError::PocketOutsideTable(i));
            }
            for (j, b) in pockets.iter().enumerate().skip(i + 1) {
                if a.pos.distance(b.pos) < a.capture_radius() + b.capture_radius() {
                    return Err(ConfigError::OverlappingPockets { a: i, b: j });
                }
            }
        }

        if let Some(i) = self.rack.balls.iter().position(|b| b.ball_type == BallType::Cue) {
            return Err(ConfigError::CueInRack(i));
        }
        let blacks = self
            .rack
            .balls
            .iter()
            .filter(|b| b.ball_type == BallType::Black)
            .count();
        if blacks != 1 {
            return Err(ConfigError::BlackCount(blacks));
        }

        let r = self.rack.ball_radius;
        let play = table.playfield().shrink(r);
        if !play.contains(self.cue_spot()) {
            return Err(ConfigError::BallOffTable(0));
        }
        for (spec, pos) in self.rack.balls.iter().zip(self.rack_layout()) {
            if !play.contains(pos) {
                return Err(ConfigError::BallOffTable(spec.number));
            }
        }

        self.validate_rules()
    }

    fn validate_rules(&self) -> Result<(), ConfigError> {
        let rules = &self.rules;
        if !(rules.settle_epsilon > 0.0) {
            return Err(ConfigError::InvalidRule(format!(
                "settle_epsilon must be positive, got {}",
                rules.settle_epsilon
            )));
        }
        let inner = self.table.pocket_radius - self.rack.ball_radius * rules.containment_factor;
        if rules.containment_factor < 0.0 || inner <= 0.0 {
            return Err(ConfigError::InvalidRule(format!(
                "containment_factor {} leaves no capture area",
                rules.containment_factor
            )));
        }
        if !(rules.max_pullback > 0.0) {
            return Err(ConfigError::InvalidRule(format!(
                "max_pullback must be positive, got {}",
                rules.max_pullback
            )));
        }
        if rules.min_power < 0.0 || rules.min_power > rules.max_power {
            return Err(ConfigError::InvalidRule(format!(
                "power range [{}, {}] is empty",
                rules.min_power, rules.max_power
            )));
        }
        if let Some(player) = rules.local_player {
            if player.0 > 1 {
                return Err(ConfigError::InvalidRule(format!(
                    "local_player must be 0 or 1, got {}",
                    player.0
                )));
            }
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
