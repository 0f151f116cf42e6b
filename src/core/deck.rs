/// Event deck: decides where the next event comes from.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::content::QuestionPools;
use crate::core::generator::QuestionGenerator;
use crate::core::random::{choose, RandomSource};
use crate::schema::event::GameEvent;
use crate::schema::level::{Level, PerLevel};

/// How the deck sources events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventMode {
    /// Authored option events first, procedural questions once the level's
    /// curated events are used up.
    Curated,
    /// Procedural free-text questions only.
    #[default]
    Generated,
}

pub struct EventDeck<'a> {
    curated: &'a [GameEvent],
    generator: QuestionGenerator<'a>,
    mode: EventMode,
}

impl<'a> EventDeck<'a> {
    pub fn new(curated: &'a [GameEvent], pools: &'a PerLevel<QuestionPools>, mode: EventMode) -> Self {
        Self {
            curated,
            generator: QuestionGenerator::new(pools),
            mode,
        }
    }

    /// Curated events of `level` not yet in `completed`.
    pub fn remaining_curated(&self, level: Level, completed: &FxHashSet<u64>) -> Vec<&'a GameEvent> {
        self.curated
            .iter()
            .filter(|event| event.level == level && !completed.contains(&event.id))
            .collect()
    }

    pub fn next_event(
        &self,
        level: Level,
        completed: &FxHashSet<u64>,
        client_name: &str,
        rng: &mut dyn RandomSource,
    ) -> GameEvent {
        if self.mode == EventMode::Curated {
            let remaining = self.remaining_curated(level, completed);
            if let Some(event) = choose(rng, &remaining) {
                return (*event).clone();
            }
            log::debug!("curated events for {} exhausted, generating", level);
        }
        self.generator.generate(level, client_name, rng)
    }
}
