use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::client::ClientId;
use super::level::{InsuranceStatus, Level};

/// Upper bound for health and per-level progress.
pub const MAX_PERCENT: u8 = 100;

/// Clamp a signed intermediate value into `0..=100`.
pub fn clamp_percent(value: i64) -> u8 {
    value.clamp(0, MAX_PERCENT as i64) as u8
}

/// The authoritative state of one game session.
///
/// Serialized in camelCase so saves read the same as the web client's
/// `gameState` payload. Game over and game won are derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub client_id: ClientId,
    pub level: Level,
    pub turn: u32,
    pub score: i64,
    pub client_health: u8,
    pub level_progress: [u8; 3],
    pub insurance_status: InsuranceStatus,
    #[serde(default)]
    pub completed_events: FxHashSet<u64>,
}

impl GameState {
    /// Fresh state for a new client: level 0, turn 1, full health.
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            level: Level::Awareness,
            turn: 1,
            score: 0,
            client_health: MAX_PERCENT,
            level_progress: [0; 3],
            insurance_status: InsuranceStatus::Uninsured,
            completed_events: FxHashSet::default(),
        }
    }

    pub fn progress(&self, level: Level) -> u8 {
        self.level_progress[level.index()]
    }

    /// Progress of the level currently being played.
    pub fn current_progress(&self) -> u8 {
        self.progress(self.level)
    }

    pub fn is_game_over(&self) -> bool {
        self.client_health == 0
    }

    pub fn is_game_won(&self) -> bool {
        self.progress(Level::Utilization) >= MAX_PERCENT
    }

    /// Either terminal predicate holds; the presentation layer should stop
    /// accepting answers.
    pub fn is_finished(&self) -> bool {
        self.is_game_over() || self.is_game_won()
    }

    /// Mood label derived from health.
    pub fn client_status(&self) -> &'static str {
        match self.client_health {
            81..=u8::MAX => "Confident",
            61..=80 => "Satisfied",
            41..=60 => "Concerned",
            21..=40 => "Anxious",
            _ => "Distressed",
        }
    }

    /// Checks the range invariants. Used on states arriving from storage.
    ///
    /// Levels before the current one must be complete and levels after it
    /// untouched, so a won state is always on the final level.
    pub fn is_consistent(&self) -> bool {
        let current = self.level.index();
        self.turn >= 1
            && self.client_health <= MAX_PERCENT
            && self.insurance_status == InsuranceStatus::for_level(self.level)
            && self.level_progress.iter().enumerate().all(|(i, p)| match i.cmp(&current) {
                Ordering::Less => *p == MAX_PERCENT,
                Ordering::Equal => *p <= MAX_PERCENT,
                Ordering::Greater => *p == 0,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_defaults() {
        let state = GameState::new(ClientId(7));
        assert_eq!(state.level, Level::Awareness);
        assert_eq!(state.turn, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.client_health, 100);
        assert_eq!(state.level_progress, [0, 0, 0]);
        assert_eq!(state.insurance_status, InsuranceStatus::Uninsured);
        assert!(state.completed_events.is_empty());
        assert!(!state.is_finished());
    }

    #[test]
    fn clamp_percent_bounds() {
        assert_eq!(clamp_percent(-40), 0);
        assert_eq!(clamp_percent(55), 55);
        assert_eq!(clamp_percent(180), 100);
    }

    #[test]
    fn terminal_predicates() {
        let mut state = GameState::new(ClientId(1));
        state.client_health = 0;
        assert!(state.is_game_over());

        let mut state = GameState::new(ClientId(1));
        state.level = Level::Utilization;
        state.level_progress = [100, 100, 100];
        assert!(state.is_game_won());
        assert!(!state.is_game_over());
    }

    #[test]
    fn client_status_thresholds() {
        let mut state = GameState::new(ClientId(1));
        for (health, label) in [
            (100, "Confident"),
            (81, "Confident"),
            (80, "Satisfied"),
            (60, "Concerned"),
            (40, "Anxious"),
            (20, "Distressed"),
            (0, "Distressed"),
        ] {
            state.client_health = health;
            assert_eq!(state.client_status(), label, "health {}", health);
        }
    }

    #[test]
    fn serializes_camel_case() {
        let mut state = GameState::new(ClientId(12));
        state.completed_events.insert(100_345);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["clientId"], 12);
        assert_eq!(json["clientHealth"], 100);
        assert_eq!(json["insuranceStatus"], "Uninsured");
        assert_eq!(json["levelProgress"], serde_json::json!([0, 0, 0]));
        assert_eq!(json["completedEvents"], serde_json::json!([100_345]));
    }

    #[test]
    fn consistency_checks_status_lockstep() {
        let mut state = GameState::new(ClientId(1));
        assert!(state.is_consistent());
        state.level = Level::Enrollment;
        state.level_progress = [100, 0, 0];
        assert!(!state.is_consistent());
        state.insurance_status = InsuranceStatus::ShoppingForPlans;
        assert!(state.is_consistent());
    }

    #[test]
    fn consistency_checks_progress_order() {
        let mut state = GameState::new(ClientId(1));
        state.level_progress = [0, 0, 100];
        assert!(state.is_game_won());
        assert!(!state.is_consistent());

        state.level_progress = [60, 30, 0];
        assert!(!state.is_consistent());

        state.level = Level::Enrollment;
        state.insurance_status = InsuranceStatus::ShoppingForPlans;
        state.level_progress = [90, 30, 0];
        assert!(!state.is_consistent());
        state.level_progress = [100, 30, 0];
        assert!(state.is_consistent());
    }
}
