//! Error types for terrain, physics and configuration

use thiserror::Error;

/// Terrain generation and height query failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// Queried x lies outside the landscape's horizontal span
    #[error("x = {x} is outside the landscape span [{min}, {max}]")]
    OutOfRange { x: f32, min: f32, max: f32 },
    /// Landscape is too short or empty to be queried
    #[error("landscape has {0} vertices, need at least 2")]
    Degenerate(usize),
    /// Random draws never produced a playable landscape
    #[error("terrain generation did not converge after {attempts} attempts")]
    GenerationDidNotConverge { attempts: u32 },
    /// Notch footprint would swallow the first or last landscape vertex
    #[error("hole at x = {center} leaves no terrain on one side")]
    HoleOutOfBounds { center: f32 },
}

/// Ball physics failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Bounce resolution kept finding intersections
    #[error("bounce resolution exceeded {iterations} iterations")]
    Divergence { iterations: u32 },
    /// Rest check queried the ground outside the landscape
    #[error("ball left the landscape: {0}")]
    OffLandscape(#[from] TerrainError),
}

/// Tuning load/validation failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Any failure the game loop can surface
#[derive(Debug, Error)]
pub enum GolfError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
