//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame deltas only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod celebration;
pub mod collision;
pub mod geometry;
pub mod physics;
pub mod rng;
pub mod state;
pub mod terrain;
pub mod tick;

pub use celebration::{Celebration, CelebrationStatus, Explosion, Particle};
pub use collision::{bounce_velocity, first_intersecting_segment, is_in_hole};
pub use geometry::{Segment, Transform2D, segments_intersect};
pub use physics::{Resolution, StepOutcome, resolve_velocity, step_ball};
pub use rng::{RandomSource, SeededRng};
pub use state::{AimState, Ball, BallState, Diagnostics, GamePhase, GameState};
pub use terrain::{Hole, Landscape, generate_landscape, hole_pattern, setup_hole, splice_hole};
pub use tick::{PointerEvent, TickInput, advance};
