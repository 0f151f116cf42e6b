/// Turn arithmetic as pure functions over `GameState`.
///
/// Each function takes the current state by reference and returns the next
/// one; the session decides when each is allowed to run.

use crate::core::config::EngineConfig;
use crate::schema::event::EventOption;
use crate::schema::level::{InsuranceStatus, Level};
use crate::schema::state::{clamp_percent, GameState, MAX_PERCENT};

/// The numeric rules a turn is played under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnRules {
    pub health_decay_per_turn: i32,
    pub progress_base: i32,
    pub progress_score_divisor: i32,
}

impl Default for TurnRules {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for TurnRules {
    fn from(config: &EngineConfig) -> Self {
        Self {
            health_decay_per_turn: config.health_decay_per_turn,
            progress_base: config.progress_base,
            progress_score_divisor: config.progress_score_divisor.max(1),
        }
    }
}

impl TurnRules {
    /// `floor(base + score / divisor)`, never negative.
    pub fn progress_increment(&self, score_effect: i32) -> i32 {
        self.progress_base
            .saturating_add(score_effect.div_euclid(self.progress_score_divisor))
            .max(0)
    }
}

/// Apply a chosen option to the state of the event `event_id`.
pub fn apply_option(state: &GameState, event_id: u64, option: &EventOption, rules: &TurnRules) -> GameState {
    let mut next = state.clone();
    next.client_health = clamp_percent(state.client_health as i64 + option.health_effect as i64);
    next.score = state.score + option.score_effect as i64;
    next.completed_events.insert(event_id);

    let idx = state.level.index();
    let gained = rules.progress_increment(option.score_effect) as i64;
    next.level_progress[idx] = clamp_percent(state.level_progress[idx] as i64 + gained);
    next
}

/// Move to the next turn after an outcome has been shown.
///
/// Returns the new state and the level entered, if the current level was
/// completed. Level-ups happen at most once per call and never past the
/// final level.
pub fn advance_turn(state: &GameState, turn_effect: i32, rules: &TurnRules) -> (GameState, Option<Level>) {
    let mut next = state.clone();
    let elapsed = u32::try_from((i64::from(turn_effect) + 1).max(0)).unwrap_or(u32::MAX);
    next.turn = state.turn.saturating_add(elapsed);
    next.client_health =
        clamp_percent(state.client_health as i64 - rules.health_decay_per_turn as i64);

    let mut entered = None;
    if state.current_progress() >= MAX_PERCENT {
        if let Some(level) = state.level.next() {
            next.level = level;
            next.insurance_status = InsuranceStatus::for_level(level);
            entered = Some(level);
        }
    }
    (next, entered)
}

/// Apply a setback's impacts to the current level.
pub fn apply_setback(state: &GameState, health_impact: i32, progress_impact: i32) -> GameState {
    let mut next = state.clone();
    next.client_health = clamp_percent(state.client_health as i64 + health_impact as i64);
    let idx = state.level.index();
    next.level_progress[idx] = clamp_percent(state.level_progress[idx] as i64 + progress_impact as i64);
    next
}
