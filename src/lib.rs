//! Putt Hole - A 2D mini-golf simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, physics, game state, celebration)
//! - `scene`: Drawable scene description handed to a renderer
//! - `score`: Read-only score counters for display
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod scene;
pub mod score;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, GolfError, PhysicsError, TerrainError};
pub use score::Score;
pub use tuning::Tuning;

use glam::Vec2;

/// Default game constants (all distances are in normalized `[0, 1]` screen units)
pub mod consts {
    use glam::Vec2;

    /// Landscape generation
    pub const MIN_SEG_LEN: f32 = 0.025;
    pub const MAX_SEG_LEN: f32 = 0.15;
    pub const MIN_GROUND_HEIGHT: f32 = 0.1;
    pub const MAX_GROUND_HEIGHT: f32 = 0.45;
    /// Probability of a flat twin after each generated point
    pub const FLAT_CHANCE: f32 = 0.6;
    /// First landscape vertex
    pub const LANDSCAPE_ANCHOR: Vec2 = Vec2::new(0.0, 0.4);

    /// Ball
    pub const BALL_RADIUS: f32 = 0.01;
    pub const BALL_START_X: f32 = 0.1;
    /// Lift above the surface so the ball doesn't start inside the ground
    pub const BALL_START_LIFT: f32 = 0.001;
    pub const SHOT_STRENGTH: f32 = 1.5;

    /// Hole notch
    pub const HOLE_FLAT_WIDTH: f32 = 0.01;
    pub const HALF_HOLE_WIDTH: f32 = 0.02;
    pub const HOLE_DEPTH: f32 = 0.05;
    pub const HOLE_MIN_X: f32 = 0.7;
    pub const HOLE_MAX_X: f32 = 0.9;

    /// Physics
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -0.2);
    pub const BOUNCE_LOSS: f32 = 0.3;
    /// Milliseconds to simulation time units
    pub const GAME_SPEED: f32 = 0.0022;
    pub const VELOCITY_THRESHOLD: f32 = 0.02;
    pub const TO_GROUND_THRESHOLD: f32 = 0.002;
    pub const MAX_BOUNCE_ITERATIONS: u32 = 64;
    pub const MAX_GENERATION_ATTEMPTS: u32 = 16;

    /// Celebration (times in milliseconds)
    pub const NUM_PARTICLES: usize = 150;
    pub const NUM_TRAILS: usize = 10;
    pub const EXPLOSION_SPEED: f32 = 0.1;
    pub const NUM_EXPLOSIONS: u32 = 5;
    pub const EXPLOSION_LIFE: f32 = 1100.0;
    pub const EXPLOSION_INTERVAL: f32 = 200.0;
    pub const NEW_HOLE_DELAY: f32 = 200.0;
    pub const TRAIL_INTERVAL: f32 = 20.0;
    pub const EXPLOSION_CENTER: Vec2 = Vec2::new(0.7, 0.8);
    pub const EXPLOSION_JITTER: Vec2 = Vec2::new(0.2, 0.1);

    /// Nominal host frame time used by the native driver
    pub const FRAME_MS: f32 = 16.0;
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Unsigned angle between two vectors in `[0, π]`.
///
/// Returns `None` when either vector has zero length.
#[inline]
pub fn angle_between(u: Vec2, v: Vec2) -> Option<f32> {
    let u = u.try_normalize()?;
    let v = v.try_normalize()?;
    Some(u.dot(v).clamp(-1.0, 1.0).acos())
}

/// Signed angle from `u` to `v`, folded into `[-π/2, π/2]`.
///
/// Uses the arcsine of the cross product, so directions more than a right
/// angle apart are mirrored. Zero-length input gives zero.
#[inline]
pub fn signed_angle_between(u: Vec2, v: Vec2) -> f32 {
    let u = u.normalize_or_zero();
    let v = v.normalize_or_zero();
    u.perp_dot(v).clamp(-1.0, 1.0).asin()
}
