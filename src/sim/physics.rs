//! Ball integration and bounce resolution
//!
//! One step: add gravity, resolve bounces against the landscape, move, then
//! check the screen bounds. All times here are already scaled by
//! `game_speed`.

use glam::Vec2;

use super::collision::{bounce_velocity, first_intersecting_segment};
use super::geometry::Segment;
use super::state::Ball;
use super::terrain::{Hole, Landscape};
use crate::error::{PhysicsError, TerrainError};
use crate::tuning::Tuning;

/// What resolving the ball's velocity decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Slow and on the ground: stop
    Rest,
    /// Move with this velocity
    Travel(Vec2),
}

/// Result of one physics step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Ball wasn't rolling
    Idle,
    Moving,
    CameToRest,
    /// Left the screen and went back to the tee
    OutOfBounds,
    /// Bounce loop hit its cap; ball forced to rest in place
    Diverged(PhysicsError),
    /// Terrain query failed mid-flight; ball sent back to the tee
    InvariantViolation(TerrainError),
}

/// Resolve bounces for a ball at `position` moving with `velocity`.
///
/// Each pass either stops the ball, accepts the velocity, or reflects it off
/// the first landscape edge its travel would cross and tries again from the
/// same position. Multiple bounces can happen inside one step.
pub fn resolve_velocity(
    position: Vec2,
    velocity: Vec2,
    landscape: &Landscape,
    tuning: &Tuning,
    delta: f32,
) -> Result<Resolution, PhysicsError> {
    let mut velocity = velocity;

    for _ in 0..tuning.max_bounce_iterations {
        if velocity.length() < tuning.velocity_threshold
            && landscape.distance_to_surface(position)? < tuning.to_ground_threshold
        {
            return Ok(Resolution::Rest);
        }

        let travel = Segment::new(position, position + velocity * delta);
        match first_intersecting_segment(landscape, &travel) {
            Some(surface) => velocity = bounce_velocity(velocity, &surface, tuning.bounce_loss),
            None => return Ok(Resolution::Travel(velocity)),
        }
    }

    Err(PhysicsError::Divergence {
        iterations: tuning.max_bounce_iterations,
    })
}

/// True when x has left the open `(0, 1)` playfield
#[inline]
pub fn out_of_bounds(pos: Vec2) -> bool {
    pos.x <= 0.0 || pos.x >= 1.0
}

/// Advance a rolling ball by `delta` scaled time units
pub fn step_ball(ball: &mut Ball, hole: &Hole, tuning: &Tuning, delta: f32) -> StepOutcome {
    if !ball.is_rolling() {
        return StepOutcome::Idle;
    }

    ball.vel += tuning.gravity * delta;

    let outcome = match resolve_velocity(ball.pos, ball.vel, &hole.landscape, tuning, delta) {
        Ok(Resolution::Rest) => {
            ball.come_to_rest();
            StepOutcome::CameToRest
        }
        Ok(Resolution::Travel(velocity)) => {
            ball.vel = velocity;
            ball.pos += velocity * delta;
            StepOutcome::Moving
        }
        Err(PhysicsError::OffLandscape(e)) => {
            ball.reset_to(hole.starting_position);
            return StepOutcome::InvariantViolation(e);
        }
        Err(e @ PhysicsError::Divergence { .. }) => {
            ball.come_to_rest();
            return StepOutcome::Diverged(e);
        }
    };

    if out_of_bounds(ball.pos) {
        ball.reset_to(hole.starting_position);
        return StepOutcome::OutOfBounds;
    }
    outcome
}
