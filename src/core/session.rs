/// Game session: the turn state machine that owns the authoritative
/// `GameState` and sequences answers, turns and setbacks.
///
/// Phases: `AwaitingResponse` → `ShowingOutcome` → `AwaitingResponse` or
/// `SetbackPending` → `AwaitingResponse`. Game over and game won are
/// derived from the state, not phases.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::core::client_gen::ClientGenerator;
use crate::core::config::EngineConfig;
use crate::core::content::GameContent;
use crate::core::deck::EventDeck;
use crate::core::evaluator::{option_from_evaluation, Evaluation, ResponseEvaluator};
use crate::core::persist::{PersistError, SaveStore, SavedGame};
use crate::core::random::RandomSource;
use crate::core::setback::{CountdownTick, SetbackCountdown, SetbackInjector};
use crate::core::turn::{self, TurnRules};
use crate::schema::client::{Client, ClientId};
use crate::schema::event::{EventOption, GameEvent};
use crate::schema::level::Level;
use crate::schema::setback::Setback;
use crate::schema::state::GameState;

/// Restart picks a client id in `1..=CLIENT_ID_RANGE`.
const CLIENT_ID_RANGE: usize = 1_000;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("response text is empty")]
    EmptyResponse,
    #[error("action needs phase {expected} but the session is {found}")]
    InvalidPhase {
        expected: &'static str,
        found: &'static str,
    },
    #[error("the game has ended; restart to play again")]
    GameFinished,
    #[error("no setback is pending")]
    NoSetbackPending,
    #[error("event {event} has no option {option}")]
    UnknownOption { event: u64, option: u32 },
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),
}

/// Where the session is within a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnPhase {
    AwaitingResponse,
    ShowingOutcome {
        selected: EventOption,
    },
    SetbackPending {
        setback: Setback,
        countdown: SetbackCountdown,
    },
}

impl TurnPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingResponse => "awaiting-response",
            Self::ShowingOutcome { .. } => "showing-outcome",
            Self::SetbackPending { .. } => "setback-pending",
        }
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs the presentation layer can send.
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    SelectOption(EventOption),
    SubmitResponse(String),
    Continue,
    ApplySetback {
        health_impact: i32,
        progress_impact: i32,
    },
    AcknowledgeSetback,
    TickSetback,
    Restart,
}

/// What happened when a turn was advanced.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// Level entered this turn, if the previous one was completed.
    pub entered_level: Option<Level>,
    /// Setback now pending, if one struck.
    pub setback: Option<Setback>,
}

/// Result of a dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    OutcomeShown {
        option: EventOption,
        evaluation: Option<Evaluation>,
    },
    TurnAdvanced(TurnReport),
    SetbackApplied {
        health_impact: i32,
        progress_impact: i32,
    },
    CountdownRunning(u32),
    Restarted(ClientId),
}

pub struct GameSession {
    content: Arc<GameContent>,
    config: EngineConfig,
    rules: TurnRules,
    rng: Box<dyn RandomSource>,
    state: GameState,
    client: Client,
    current_event: GameEvent,
    phase: TurnPhase,
    previous_progress: [u8; 3],
}

impl GameSession {
    /// Start a session for a randomly chosen client.
    pub fn new(content: Arc<GameContent>, config: EngineConfig, mut rng: Box<dyn RandomSource>) -> Self {
        let client_id = draw_client_id(rng.as_mut());
        Self::with_client(content, config, rng, client_id)
    }

    /// Start a session for a specific client.
    pub fn with_client(
        content: Arc<GameContent>,
        config: EngineConfig,
        rng: Box<dyn RandomSource>,
        client_id: ClientId,
    ) -> Self {
        let client = ClientGenerator::new(&content.clients).profile(client_id);
        let rules = TurnRules::from(&config);
        let placeholder = GameEvent {
            id: 0,
            title: String::new(),
            description: String::new(),
            prompt: None,
            level: Level::Awareness,
            health_impact: 0,
            options: Vec::new(),
        };
        let mut session = Self {
            content,
            config,
            rules,
            rng,
            state: GameState::new(client_id),
            client,
            current_event: placeholder,
            phase: TurnPhase::AwaitingResponse,
            previous_progress: [0; 3],
        };
        session.deal_event();
        log::info!(
            "session started for client {} ({})",
            client_id.0,
            session.client.name
        );
        session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn current_event(&self) -> &GameEvent {
        &self.current_event
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Per-level progress before the most recent change, for animating
    /// progress bars.
    pub fn previous_progress(&self) -> [u8; 3] {
        self.previous_progress
    }

    /// The option chosen this turn, while its outcome is on screen.
    pub fn selected_option(&self) -> Option<&EventOption> {
        match &self.phase {
            TurnPhase::ShowingOutcome { selected } => Some(selected),
            _ => None,
        }
    }

    pub fn pending_setback(&self) -> Option<(&Setback, u32)> {
        match &self.phase {
            TurnPhase::SetbackPending { setback, countdown } => Some((setback, countdown.remaining())),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn is_game_won(&self) -> bool {
        self.state.is_game_won()
    }

    pub fn client_status(&self) -> &'static str {
        self.state.client_status()
    }

    /// Apply `option` as the answer to the current event.
    pub fn select_option(&mut self, option: EventOption) -> Result<(), SessionError> {
        self.ensure_playable()?;
        self.ensure_phase("awaiting-response", |p| matches!(p, TurnPhase::AwaitingResponse))?;

        self.previous_progress = self.state.level_progress;
        self.state = turn::apply_option(&self.state, self.current_event.id, &option, &self.rules);
        log::debug!(
            "option {} on event {}: health={} score={} progress={:?}",
            option.id,
            self.current_event.id,
            self.state.client_health,
            self.state.score,
            self.state.level_progress
        );
        if self.state.is_game_over() {
            log::info!("client {} can no longer continue", self.state.client_id.0);
        }
        self.phase = TurnPhase::ShowingOutcome { selected: option };
        Ok(())
    }

    /// Pick one of the current event's own options by id.
    pub fn choose_option(&mut self, option_id: u32) -> Result<(), SessionError> {
        let option = self
            .current_event
            .option(option_id)
            .cloned()
            .ok_or(SessionError::UnknownOption {
                event: self.current_event.id,
                option: option_id,
            })?;
        self.select_option(option)
    }

    /// Score a free-text answer and apply it as the selected option.
    pub fn submit_response(&mut self, text: &str) -> Result<Evaluation, SessionError> {
        self.ensure_playable()?;
        self.ensure_phase("awaiting-response", |p| matches!(p, TurnPhase::AwaitingResponse))?;
        if text.trim().is_empty() {
            return Err(self.reject(SessionError::EmptyResponse));
        }

        let evaluator = ResponseEvaluator::new(
            &self.content.keywords,
            &self.content.outcomes,
            self.config.ineffective_chance,
        );
        let evaluation = evaluator.evaluate(text, self.current_event.level, self.rng.as_mut());
        let option = option_from_evaluation(text, &evaluation);
        self.select_option(option)?;
        Ok(evaluation)
    }

    /// Close out the shown outcome and move to the next turn.
    ///
    /// Unlike a bare reducer, the session stops itself at the end of the
    /// game: this returns `GameFinished` once the client has given up or
    /// the final level is complete. When the turn's own health decay ends
    /// the game, the setback draw is skipped, so no setback is ever
    /// pending on a finished game. Only `restart` and `load_from` resume.
    pub fn continue_turn(&mut self) -> Result<TurnReport, SessionError> {
        let turn_effect = match &self.phase {
            TurnPhase::ShowingOutcome { selected } => selected.turn_effect,
            other => {
                let found = other.name();
                return Err(self.reject(SessionError::InvalidPhase {
                    expected: "showing-outcome",
                    found,
                }));
            }
        };
        self.ensure_playable()?;

        let (next, entered_level) = turn::advance_turn(&self.state, turn_effect, &self.rules);
        self.state = next;
        if let Some(level) = entered_level {
            log::info!(
                "client {} advanced to {} ({})",
                self.state.client_id.0,
                level,
                self.state.insurance_status
            );
        }
        self.phase = TurnPhase::AwaitingResponse;

        let mut setback = None;
        if !self.state.is_finished() && self.rng.next_unit() < self.config.setback_turn_chance {
            let injector = SetbackInjector::new(
                self.config.setback_appear_percent,
                self.config.setback_weight_divisor,
            );
            setback = injector
                .maybe_select(self.state.level, &self.content.setbacks, self.rng.as_mut())
                .cloned();
        }

        match &setback {
            Some(chosen) => {
                self.phase = TurnPhase::SetbackPending {
                    setback: chosen.clone(),
                    countdown: SetbackCountdown::new(self.config.countdown_ticks),
                };
            }
            None => self.deal_event(),
        }

        Ok(TurnReport {
            entered_level,
            setback,
        })
    }

    /// Apply the given impacts to resolve the pending setback.
    pub fn apply_setback(&mut self, health_impact: i32, progress_impact: i32) -> Result<(), SessionError> {
        if !matches!(self.phase, TurnPhase::SetbackPending { .. }) {
            return Err(self.reject(SessionError::NoSetbackPending));
        }
        self.previous_progress = self.state.level_progress;
        self.state = turn::apply_setback(&self.state, health_impact, progress_impact);
        log::info!(
            "setback applied: health {} progress {} -> health={} progress={:?}",
            health_impact,
            progress_impact,
            self.state.client_health,
            self.state.level_progress
        );
        self.phase = TurnPhase::AwaitingResponse;
        self.deal_event();
        Ok(())
    }

    /// Resolve the pending setback with its own impacts.
    pub fn acknowledge_setback(&mut self) -> Result<(i32, i32), SessionError> {
        let impacts = match &self.phase {
            TurnPhase::SetbackPending { setback, .. } => (setback.health_impact, setback.progress_impact),
            _ => return Err(self.reject(SessionError::NoSetbackPending)),
        };
        self.apply_setback(impacts.0, impacts.1)?;
        Ok(impacts)
    }

    /// Advance the pending setback's countdown; on expiry it applies itself.
    pub fn tick_setback(&mut self) -> Result<CountdownTick, SessionError> {
        let tick = match &mut self.phase {
            TurnPhase::SetbackPending { countdown, .. } => countdown.tick(),
            _ => return Err(self.reject(SessionError::NoSetbackPending)),
        };
        if tick == CountdownTick::Expired {
            self.acknowledge_setback()?;
        }
        Ok(tick)
    }

    /// Throw the game away and start over with a new client.
    pub fn restart(&mut self) -> ClientId {
        let client_id = draw_client_id(self.rng.as_mut());
        self.state = GameState::new(client_id);
        self.client = ClientGenerator::new(&self.content.clients).profile(client_id);
        self.phase = TurnPhase::AwaitingResponse;
        self.previous_progress = [0; 3];
        self.deal_event();
        log::info!("restarted with client {} ({})", client_id.0, self.client.name);
        client_id
    }

    pub fn dispatch(&mut self, action: GameAction) -> Result<Transition, SessionError> {
        match action {
            GameAction::SelectOption(option) => {
                self.select_option(option.clone())?;
                Ok(Transition::OutcomeShown {
                    option,
                    evaluation: None,
                })
            }
            GameAction::SubmitResponse(text) => {
                let evaluation = self.submit_response(&text)?;
                let option = self.selected_option().cloned().ok_or(SessionError::InvalidPhase {
                    expected: "showing-outcome",
                    found: self.phase.name(),
                })?;
                Ok(Transition::OutcomeShown {
                    option,
                    evaluation: Some(evaluation),
                })
            }
            GameAction::Continue => self.continue_turn().map(Transition::TurnAdvanced),
            GameAction::ApplySetback {
                health_impact,
                progress_impact,
            } => {
                self.apply_setback(health_impact, progress_impact)?;
                Ok(Transition::SetbackApplied {
                    health_impact,
                    progress_impact,
                })
            }
            GameAction::AcknowledgeSetback => {
                let (health_impact, progress_impact) = self.acknowledge_setback()?;
                Ok(Transition::SetbackApplied {
                    health_impact,
                    progress_impact,
                })
            }
            GameAction::TickSetback => {
                let pending = self
                    .pending_setback()
                    .map(|(s, _)| (s.health_impact, s.progress_impact));
                match self.tick_setback()? {
                    CountdownTick::Running(remaining) => Ok(Transition::CountdownRunning(remaining)),
                    CountdownTick::Expired => {
                        let (health_impact, progress_impact) = pending.unwrap_or((0, 0));
                        Ok(Transition::SetbackApplied {
                            health_impact,
                            progress_impact,
                        })
                    }
                }
            }
            GameAction::Restart => Ok(Transition::Restarted(self.restart())),
        }
    }

    /// Write the current state under `identifier`.
    pub fn save_to(&self, store: &mut dyn SaveStore, identifier: &str, username: &str) -> Result<(), SessionError> {
        let saved = SavedGame::new(username, self.state.clone());
        let result = saved
            .to_json()
            .and_then(|json| store.save(identifier, &json));
        match result {
            Ok(()) => {
                log::info!("saved game '{}' for {}", identifier, username);
                Ok(())
            }
            Err(err) => Err(self.reject(err.into())),
        }
    }

    /// Replace the session with the game saved under `identifier`.
    ///
    /// Returns `Ok(false)` when nothing is saved there. On any error the
    /// session is left exactly as it was.
    pub fn load_from(&mut self, store: &dyn SaveStore, identifier: &str) -> Result<bool, SessionError> {
        let saved = match store.load(identifier) {
            Ok(Some(json)) => SavedGame::from_json(&json),
            Ok(None) => return Ok(false),
            Err(err) => Err(err),
        };
        let saved = match saved {
            Ok(saved) if saved.game_state.is_consistent() => saved,
            Ok(_) => {
                return Err(self.reject(PersistError::InconsistentState(identifier.to_string()).into()))
            }
            Err(err) => return Err(self.reject(err.into())),
        };

        self.state = saved.game_state;
        self.client = ClientGenerator::new(&self.content.clients).profile(self.state.client_id);
        self.previous_progress = self.state.level_progress;
        self.phase = TurnPhase::AwaitingResponse;
        self.deal_event();
        log::info!(
            "loaded game '{}' for {}: level {} turn {}",
            identifier,
            saved.username,
            self.state.level,
            self.state.turn
        );
        Ok(true)
    }

    fn deal_event(&mut self) {
        let deck = EventDeck::new(&self.content.events, &self.content.questions, self.config.event_mode);
        self.current_event = deck.next_event(
            self.state.level,
            &self.state.completed_events,
            &self.client.name,
            self.rng.as_mut(),
        );
    }

    fn ensure_playable(&self) -> Result<(), SessionError> {
        if self.state.is_finished() {
            return Err(self.reject(SessionError::GameFinished));
        }
        Ok(())
    }

    fn ensure_phase(
        &self,
        expected: &'static str,
        allowed: impl Fn(&TurnPhase) -> bool,
    ) -> Result<(), SessionError> {
        if !allowed(&self.phase) {
            return Err(self.reject(SessionError::InvalidPhase {
                expected,
                found: self.phase.name(),
            }));
        }
        Ok(())
    }

    fn reject(&self, err: SessionError) -> SessionError {
        log::warn!("rejected in {} at turn {}: {}", self.phase, self.state.turn, err);
        err
    }
}

fn draw_client_id(rng: &mut dyn RandomSource) -> ClientId {
    ClientId(rng.pick_index(CLIENT_ID_RANGE) as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::EventMode;
    use crate::core::random::ScriptedRandom;
    use crate::schema::event::Category;

    fn session(draws: Vec<f64>) -> GameSession {
        let content = Arc::new(GameContent::builtin().unwrap());
        GameSession::with_client(
            content,
            EngineConfig::default(),
            Box::new(ScriptedRandom::new(draws)),
            ClientId(4),
        )
    }

    fn good_option() -> EventOption {
        EventOption::with_effects(1, "good".to_string(), Category::Good.effects(), String::new())
    }

    #[test]
    fn starts_awaiting_a_generated_question() {
        let s = session(vec![0.5]);
        assert_eq!(s.phase(), &TurnPhase::AwaitingResponse);
        assert!(s.current_event().is_free_text());
        assert_eq!(s.state().turn, 1);
        assert_eq!(s.client().id, ClientId(4));
    }

    #[test]
    fn select_moves_to_outcome_and_records_event() {
        let mut s = session(vec![0.5]);
        let event_id = s.current_event().id;
        s.select_option(good_option()).unwrap();
        assert_eq!(s.selected_option().map(|o| o.id), Some(1));
        assert!(s.state().completed_events.contains(&event_id));
        assert_eq!(s.state().level_progress, [20, 0, 0]);
        assert_eq!(s.previous_progress(), [0, 0, 0]);
    }

    #[test]
    fn second_select_is_rejected() {
        let mut s = session(vec![0.5]);
        s.select_option(good_option()).unwrap();
        let before = s.state().clone();
        let err = s.select_option(good_option()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidPhase {
                expected: "awaiting-response",
                found: "showing-outcome"
            }
        ));
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn empty_response_changes_nothing() {
        let mut s = session(vec![0.5]);
        let before = s.state().clone();
        assert!(matches!(s.submit_response("   \n"), Err(SessionError::EmptyResponse)));
        assert_eq!(s.state(), &before);
        assert_eq!(s.phase(), &TurnPhase::AwaitingResponse);
    }

    #[test]
    fn continue_without_outcome_is_rejected() {
        let mut s = session(vec![0.5]);
        assert!(matches!(s.continue_turn(), Err(SessionError::InvalidPhase { .. })));
        assert!(matches!(s.tick_setback(), Err(SessionError::NoSetbackPending)));
        assert!(matches!(s.acknowledge_setback(), Err(SessionError::NoSetbackPending)));
    }

    #[test]
    fn continue_without_setback_deals_new_event() {
        // 0.9 keeps every roll above the setback chance
        let mut s = session(vec![0.9]);
        s.select_option(good_option()).unwrap();
        let report = s.continue_turn().unwrap();
        assert_eq!(report.setback, None);
        assert_eq!(report.entered_level, None);
        assert_eq!(s.phase(), &TurnPhase::AwaitingResponse);
        assert_eq!(s.state().turn, 2);
        assert_eq!(s.state().client_health, 95);
    }

    #[test]
    fn curated_option_by_id() {
        let content = Arc::new(GameContent::builtin().unwrap());
        let config = EngineConfig {
            event_mode: EventMode::Curated,
            ..EngineConfig::default()
        };
        let mut s = GameSession::with_client(
            content,
            config,
            Box::new(ScriptedRandom::new(vec![0.0])),
            ClientId(4),
        );
        assert!(!s.current_event().options.is_empty());
        let first = s.current_event().options[0].clone();
        assert!(matches!(
            s.choose_option(404),
            Err(SessionError::UnknownOption { option: 404, .. })
        ));
        s.choose_option(first.id).unwrap();
        assert_eq!(s.selected_option(), Some(&first));
    }

    #[test]
    fn restart_draws_client_in_range() {
        let mut s = session(vec![0.999]);
        let id = s.restart();
        assert_eq!(id, ClientId(1000));
        assert_eq!(s.state(), &GameState::new(ClientId(1000)));
    }
}
