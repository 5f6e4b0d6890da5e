//! Score counters exposed to the HUD
//!
//! Counters only ever go up during a session.

use serde::{Deserialize, Serialize};

/// Shots and completed holes for the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub shots_total: u32,
    pub holes_completed: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a shot
    pub fn record_shot(&mut self) {
        self.shots_total += 1;
    }

    /// Count a sunk ball
    pub fn record_hole(&mut self) {
        self.holes_completed += 1;
    }

    /// 1-based number of the hole being played
    pub fn hole_number(&self) -> u32 {
        self.holes_completed + 1
    }

    /// Average shots per hole, counting the current one
    pub fn shots_per_hole(&self) -> f32 {
        self.shots_total as f32 / self.hole_number() as f32
    }

    /// One-line summary for logs and text HUDs
    pub fn summary(&self) -> String {
        format!(
            "hole {} | shots {} | per hole {:.2}",
            self.hole_number(),
            self.shots_total,
            self.shots_per_hole()
        )
    }
}
