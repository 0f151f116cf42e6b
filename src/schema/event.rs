use serde::{Deserialize, Serialize};
use std::fmt;

use super::level::Level;

/// Qualitative bucket assigned to a player's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Excellent,
    Good,
    Average,
    Poor,
    Harmful,
    Ineffective,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Excellent,
        Category::Good,
        Category::Average,
        Category::Poor,
        Category::Harmful,
        Category::Ineffective,
    ];

    /// The five categories that carry trigger phrases. `Ineffective` is
    /// reached only through the random failure roll.
    pub const KEYWORD_TIERS: [Category; 5] = [
        Category::Excellent,
        Category::Good,
        Category::Average,
        Category::Poor,
        Category::Harmful,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Average => "average",
            Self::Poor => "poor",
            Self::Harmful => "harmful",
            Self::Ineffective => "ineffective",
        }
    }

    /// Fixed effect bundle for each category.
    pub fn effects(&self) -> EffectBundle {
        match self {
            Self::Excellent => EffectBundle::new(18, 22, 22, 35, 0),
            Self::Good => EffectBundle::new(12, 16, 12, 25, 0),
            Self::Average => EffectBundle::new(-2, 7, -2, 8, 0),
            Self::Poor => EffectBundle::new(-8, 2, -12, -8, 0),
            Self::Harmful => EffectBundle::new(-18, -8, -22, -25, 1),
            Self::Ineffective => EffectBundle::new(-12, -3, -18, -12, 1),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The five scalars an answer applies: health, knowledge, confidence,
/// score and extra turns consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EffectBundle {
    pub health: i32,
    pub knowledge: i32,
    pub confidence: i32,
    pub score: i32,
    pub turn: i32,
}

impl EffectBundle {
    pub const fn new(health: i32, knowledge: i32, confidence: i32, score: i32, turn: i32) -> Self {
        Self {
            health,
            knowledge,
            confidence,
            score,
            turn,
        }
    }
}

/// One answer the player can give to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOption {
    pub id: u32,
    pub text: String,
    pub health_effect: i32,
    #[serde(default)]
    pub knowledge_effect: i32,
    #[serde(default)]
    pub confidence_effect: i32,
    pub score_effect: i32,
    pub turn_effect: i32,
    #[serde(default)]
    pub outcome: String,
}

impl EventOption {
    /// Build an option carrying `effects`.
    pub fn with_effects(id: u32, text: String, effects: EffectBundle, outcome: String) -> Self {
        Self {
            id,
            text,
            health_effect: effects.health,
            knowledge_effect: effects.knowledge,
            confidence_effect: effects.confidence,
            score_effect: effects.score,
            turn_effect: effects.turn,
            outcome,
        }
    }

    pub fn effects(&self) -> EffectBundle {
        EffectBundle::new(
            self.health_effect,
            self.knowledge_effect,
            self.confidence_effect,
            self.score_effect,
            self.turn_effect,
        )
    }
}

/// A narrative situation presented to the player for one turn.
///
/// Events with no options are answered in free text; `prompt` then holds
/// the question. `health_impact` is narrative flavor and never scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub prompt: Option<String>,
    pub level: Level,
    #[serde(default)]
    pub health_impact: i32,
    #[serde(default)]
    pub options: Vec<EventOption>,
}

impl GameEvent {
    /// Returns true if the event is answered in free text.
    pub fn is_free_text(&self) -> bool {
        self.options.is_empty()
    }

    pub fn option(&self, id: u32) -> Option<&EventOption> {
        self.options.iter().find(|o| o.id == id)
    }
}
