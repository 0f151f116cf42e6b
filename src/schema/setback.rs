use serde::{Deserialize, Serialize};

use super::level::Level;

/// A catalog entry for an adverse event that can strike between turns.
///
/// Impacts are zero or negative. `probability` is a 0-100 selection
/// weight, not a true probability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setback {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub health_impact: i32,
    pub progress_impact: i32,
    pub probability: u32,
    pub levels: Vec<Level>,
}

impl Setback {
    /// Returns true if this setback may appear during `level`.
    pub fn applies_to(&self, level: Level) -> bool {
        self.levels.contains(&level)
    }

    /// Severe enough to warrant a "major setback" notice.
    pub fn is_major(&self) -> bool {
        self.health_impact <= -15 || self.progress_impact <= -20
    }
}
