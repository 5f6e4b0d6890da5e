//! Game state and core simulation types
//!
//! Everything the simulation reads or writes between ticks lives in one
//! owned [`GameState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::celebration::Celebration;
use super::rng::SeededRng;
use super::terrain::{Hole, setup_hole};
use crate::error::GolfError;
use crate::score::Score;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball at rest, waiting for the player to start aiming
    Still,
    /// Pointer held down, aim line visible
    Aiming,
    /// Ball in motion
    Rolling,
    /// Hole completed, fireworks playing, gameplay paused
    Celebrating,
}

/// Ball motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    Still,
    Rolling,
}

/// The golf ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            state: BallState::Still,
        }
    }

    #[inline]
    pub fn is_rolling(&self) -> bool {
        self.state == BallState::Rolling
    }

    /// Start rolling with the given velocity
    pub fn shoot(&mut self, velocity: Vec2) {
        self.vel = velocity;
        self.state = BallState::Rolling;
    }

    /// Stop in place
    pub fn come_to_rest(&mut self) {
        self.vel = Vec2::ZERO;
        self.state = BallState::Still;
    }

    /// Teleport to `pos` and stop
    pub fn reset_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.come_to_rest();
    }
}

/// Pointer drag in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimState {
    pub start: Vec2,
    pub current: Vec2,
}

impl AimState {
    pub fn new(start: Vec2) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Drag vector from where the pointer went down to where it is now
    #[inline]
    pub fn drag(&self) -> Vec2 {
        self.current - self.start
    }
}

/// Counters for recoverable anomalies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Bounce resolution hit its iteration cap
    pub divergences: u32,
    /// Terrain queries outside the landscape during play
    pub invariant_violations: u32,
    /// Times the ball left the screen
    pub out_of_bounds_resets: u32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub rng: SeededRng,
    pub phase: GamePhase,
    pub hole: Hole,
    pub ball: Ball,
    /// Present only while aiming
    pub aim: Option<AimState>,
    /// Present only while celebrating
    pub celebration: Option<Celebration>,
    pub score: Score,
    pub diagnostics: Diagnostics,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game with the given seed and tuning
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, GolfError> {
        tuning.validate()?;
        let mut rng = SeededRng::new(seed);
        let hole = setup_hole(&mut rng, &tuning)?;
        let ball = Ball::new(hole.starting_position, tuning.ball_radius);

        Ok(Self {
            tuning,
            rng,
            phase: GamePhase::Still,
            hole,
            ball,
            aim: None,
            celebration: None,
            score: Score::default(),
            diagnostics: Diagnostics::default(),
            time_ticks: 0,
        })
    }

    /// Generate the next hole and put the ball on its tee
    pub fn next_hole(&mut self) -> Result<(), GolfError> {
        self.hole = setup_hole(&mut self.rng, &self.tuning)?;
        self.ball = Ball::new(self.hole.starting_position, self.tuning.ball_radius);
        self.aim = None;
        Ok(())
    }

    /// Seed the game was started with
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Aim line endpoints for rendering: from the ball along the drag vector
    pub fn aim_line(&self) -> Option<(Vec2, Vec2)> {
        self.aim.map(|aim| (self.ball.pos, self.ball.pos + aim.drag()))
    }

    /// True when the ball sits still inside the hole
    pub fn ball_in_hole(&self) -> bool {
        self.ball.state == BallState::Still
            && super::collision::is_in_hole(
                self.ball.pos,
                self.hole.hole_bottom,
                self.tuning.half_hole_width,
            )
    }
}
