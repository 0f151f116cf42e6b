//! Health Navigator Engine: the rules core of a turn-based game about
//! guiding a client through getting and using health insurance.
//!
//! Free-text answers are scored by keyword containment, questions are
//! composed from level-keyed pools, and a session state machine applies
//! answers, advances turns and injects random setbacks. All randomness
//! flows through `core::random::RandomSource` so play can be replayed.

pub mod core;
pub mod schema;

pub use crate::core::engine::{EngineError, GameEngine};
pub use crate::core::session::{GameAction, GameSession, SessionError, Transition, TurnPhase};
