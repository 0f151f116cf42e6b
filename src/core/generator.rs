/// Procedural question generator: composes a free-text event from four
/// independently sampled pools for a level.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::content::{QuestionPools, Situation};
use crate::core::random::{choose, RandomSource};
use crate::schema::event::GameEvent;
use crate::schema::level::{Level, PerLevel};

const LEVEL_ID_STRIDE: u64 = 100_000;
const CLOCK_ID_MODULUS: u64 = 10_000;
const RANDOM_ID_RANGE: usize = 1_000;

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Event id for a generated question. Ids from different calls may
/// collide; nothing downstream relies on them being unique.
pub fn generated_event_id(level: Level, now_millis: u64, random_offset: usize) -> u64 {
    level.index() as u64 * LEVEL_ID_STRIDE + now_millis % CLOCK_ID_MODULUS + random_offset as u64
}

pub struct QuestionGenerator<'a> {
    pools: &'a PerLevel<QuestionPools>,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(pools: &'a PerLevel<QuestionPools>) -> Self {
        Self { pools }
    }

    /// Generate a question stamped with the current wall clock.
    pub fn generate(&self, level: Level, client_name: &str, rng: &mut dyn RandomSource) -> GameEvent {
        self.generate_at(level, client_name, wall_clock_millis(), rng)
    }

    /// Generate a question with an explicit clock reading.
    ///
    /// Draw order: id offset, situation, title, challenge, prompt.
    pub fn generate_at(
        &self,
        level: Level,
        client_name: &str,
        now_millis: u64,
        rng: &mut dyn RandomSource,
    ) -> GameEvent {
        let pools = self.pools.get(level);
        let id = generated_event_id(level, now_millis, rng.pick_index(RANDOM_ID_RANGE));

        let situation = choose(rng, &pools.situations);
        let title = choose(rng, &pools.titles).cloned().unwrap_or_default();
        let challenge = choose(rng, &pools.challenges).map(String::as_str).unwrap_or("");
        let prompt = choose(rng, &pools.prompts).cloned();

        let description = describe(client_name, situation, challenge);
        log::debug!("generated question {} at {}: {}", id, level, title);

        GameEvent {
            id,
            title,
            description,
            prompt,
            level,
            health_impact: 0,
            options: Vec::new(),
        }
    }

    /// A batch of independent questions for one level.
    pub fn questions_for_level(
        &self,
        level: Level,
        client_name: &str,
        count: usize,
        rng: &mut dyn RandomSource,
    ) -> Vec<GameEvent> {
        (0..count)
            .map(|_| self.generate(level, client_name, rng))
            .collect()
    }
}

fn describe(client_name: &str, situation: Option<&Situation>, challenge: &str) -> String {
    match situation {
        Some(s) => format!(
            "Your client {} is {} {}. They {}.",
            client_name, s.trait_phrase, s.context, challenge
        ),
        None => format!("Your client {}. They {}.", client_name, challenge),
    }
}
