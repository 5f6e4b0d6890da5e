//! Game tuning and balance
//!
//! Every gameplay constant lives here so a level designer can override it
//! from a JSON file without recompiling. Missing fields fall back to the
//! defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Data-driven tuning for terrain, physics and celebration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Terrain ===
    pub min_seg_len: f32,
    pub max_seg_len: f32,
    pub min_ground_height: f32,
    pub max_ground_height: f32,
    /// Probability of inserting a flat twin after each point
    pub flat_chance: f32,
    pub landscape_anchor: Vec2,
    /// Landscape redraws before giving up
    pub max_generation_attempts: u32,

    // === Hole ===
    pub hole_flat_width: f32,
    pub half_hole_width: f32,
    pub hole_depth: f32,
    pub hole_min_x: f32,
    pub hole_max_x: f32,

    // === Ball ===
    pub ball_radius: f32,
    pub ball_start_x: f32,
    pub ball_start_lift: f32,
    pub shot_strength: f32,

    // === Physics ===
    pub gravity: Vec2,
    /// Fraction of speed lost on each bounce
    pub bounce_loss: f32,
    /// Milliseconds to simulation time units
    pub game_speed: f32,
    pub velocity_threshold: f32,
    pub to_ground_threshold: f32,
    pub max_bounce_iterations: u32,

    // === Celebration (milliseconds) ===
    pub num_particles: usize,
    pub num_trails: usize,
    pub explosion_speed: f32,
    pub num_explosions: u32,
    pub explosion_life: f32,
    pub explosion_interval: f32,
    pub new_hole_delay: f32,
    pub trail_interval: f32,
    pub explosion_center: Vec2,
    pub explosion_jitter: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            min_seg_len: MIN_SEG_LEN,
            max_seg_len: MAX_SEG_LEN,
            min_ground_height: MIN_GROUND_HEIGHT,
            max_ground_height: MAX_GROUND_HEIGHT,
            flat_chance: FLAT_CHANCE,
            landscape_anchor: LANDSCAPE_ANCHOR,
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,

            hole_flat_width: HOLE_FLAT_WIDTH,
            half_hole_width: HALF_HOLE_WIDTH,
            hole_depth: HOLE_DEPTH,
            hole_min_x: HOLE_MIN_X,
            hole_max_x: HOLE_MAX_X,

            ball_radius: BALL_RADIUS,
            ball_start_x: BALL_START_X,
            ball_start_lift: BALL_START_LIFT,
            shot_strength: SHOT_STRENGTH,

            gravity: GRAVITY,
            bounce_loss: BOUNCE_LOSS,
            game_speed: GAME_SPEED,
            velocity_threshold: VELOCITY_THRESHOLD,
            to_ground_threshold: TO_GROUND_THRESHOLD,
            max_bounce_iterations: MAX_BOUNCE_ITERATIONS,

            num_particles: NUM_PARTICLES,
            num_trails: NUM_TRAILS,
            explosion_speed: EXPLOSION_SPEED,
            num_explosions: NUM_EXPLOSIONS,
            explosion_life: EXPLOSION_LIFE,
            explosion_interval: EXPLOSION_INTERVAL,
            new_hole_delay: NEW_HOLE_DELAY,
            trail_interval: TRAIL_INTERVAL,
            explosion_center: EXPLOSION_CENTER,
            explosion_jitter: EXPLOSION_JITTER,
        }
    }
}

impl Tuning {
    /// Half-width of the x-range replaced by the hole notch
    #[inline]
    pub fn hole_footprint(&self) -> f32 {
        self.hole_flat_width + self.half_hole_width
    }

    /// Total celebration length in milliseconds
    pub fn celebration_duration(&self) -> f32 {
        self.num_explosions.saturating_sub(1) as f32 * self.explosion_interval
            + self.explosion_life
            + self.new_hole_delay
    }

    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject parameter sets the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if let Some(name) = self.first_non_finite() {
            return Err(ConfigError::Invalid(format!("{name} must be finite")));
        }
        if !(self.min_seg_len > 0.0 && self.min_seg_len <= self.max_seg_len) {
            return invalid("segment lengths must satisfy 0 < min_seg_len <= max_seg_len");
        }
        if self.min_ground_height > self.max_ground_height {
            return invalid("min_ground_height exceeds max_ground_height");
        }
        if !(0.0..=1.0).contains(&self.flat_chance) {
            return invalid("flat_chance must be within [0, 1]");
        }
        if self.landscape_anchor.x != 0.0 {
            return invalid("landscape_anchor must start at x = 0");
        }
        if self.max_generation_attempts == 0 {
            return invalid("max_generation_attempts must be at least 1");
        }
        if !(self.bounce_loss > 0.0 && self.bounce_loss < 1.0) {
            return invalid("bounce_loss must be within (0, 1)");
        }
        if self.game_speed <= 0.0 {
            return invalid("game_speed must be positive");
        }
        if self.velocity_threshold < 0.0 || self.to_ground_threshold < 0.0 {
            return invalid("rest thresholds must be non-negative");
        }
        if self.max_bounce_iterations == 0 {
            return invalid("max_bounce_iterations must be at least 1");
        }
        if !(self.ball_start_x > 0.0 && self.ball_start_x < 1.0) {
            return invalid("ball_start_x must be within (0, 1)");
        }
        if self.hole_min_x > self.hole_max_x {
            return invalid("hole_min_x exceeds hole_max_x");
        }
        if self.half_hole_width <= 0.0 || self.hole_flat_width < 0.0 || self.hole_depth <= 0.0 {
            return invalid("hole dimensions must be positive");
        }
        let footprint = self.hole_footprint();
        if self.hole_min_x - footprint <= self.ball_start_x {
            return invalid("hole footprint overlaps the ball start");
        }
        if self.hole_max_x + footprint >= 1.0 {
            return invalid("hole footprint reaches the right edge");
        }
        if self.num_particles == 0 || self.num_trails == 0 {
            return invalid("num_particles and num_trails must be at least 1");
        }
        if self.explosion_interval < 0.0 || self.explosion_life < 0.0 || self.new_hole_delay < 0.0
        {
            return invalid("celebration timings must be non-negative");
        }
        if self.trail_interval <= 0.0 {
            return invalid("trail_interval must be positive");
        }
        Ok(())
    }

    /// Name of the first float parameter that is NaN or infinite
    fn first_non_finite(&self) -> Option<&'static str> {
        let scalars = [
            ("min_seg_len", self.min_seg_len),
            ("max_seg_len", self.max_seg_len),
            ("min_ground_height", self.min_ground_height),
            ("max_ground_height", self.max_ground_height),
            ("flat_chance", self.flat_chance),
            ("hole_flat_width", self.hole_flat_width),
            ("half_hole_width", self.half_hole_width),
            ("hole_depth", self.hole_depth),
            ("hole_min_x", self.hole_min_x),
            ("hole_max_x", self.hole_max_x),
            ("ball_radius", self.ball_radius),
            ("ball_start_x", self.ball_start_x),
            ("ball_start_lift", self.ball_start_lift),
            ("shot_strength", self.shot_strength),
            ("bounce_loss", self.bounce_loss),
            ("game_speed", self.game_speed),
            ("velocity_threshold", self.velocity_threshold),
            ("to_ground_threshold", self.to_ground_threshold),
            ("explosion_speed", self.explosion_speed),
            ("explosion_life", self.explosion_life),
            ("explosion_interval", self.explosion_interval),
            ("new_hole_delay", self.new_hole_delay),
            ("trail_interval", self.trail_interval),
        ];
        let vectors = [
            ("landscape_anchor", self.landscape_anchor),
            ("gravity", self.gravity),
            ("explosion_center", self.explosion_center),
            ("explosion_jitter", self.explosion_jitter),
        ];

        scalars
            .iter()
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| *name)
            .or_else(|| {
                vectors
                    .iter()
                    .find(|(_, v)| !v.is_finite())
                    .map(|(name, _)| *name)
            })
    }
}
