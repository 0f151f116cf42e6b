/// Random setback injector: weighted selection from a level-filtered
/// catalog, and the countdown that force-applies a pending setback.

use crate::core::random::RandomSource;
use crate::schema::level::Level;
use crate::schema::setback::Setback;

pub struct SetbackInjector {
    appear_percent: f64,
    weight_divisor: u32,
}

impl SetbackInjector {
    /// `appear_percent` is compared against a draw in `[0, 100)`;
    /// `weight_divisor` scales catalog weights into pool copies.
    pub fn new(appear_percent: f64, weight_divisor: u32) -> Self {
        Self {
            appear_percent,
            weight_divisor: weight_divisor.max(1),
        }
    }

    /// Each eligible setback repeated `ceil(probability / divisor)` times.
    /// A zero weight contributes no copies.
    pub fn weighted_pool<'a>(&self, level: Level, catalog: &'a [Setback]) -> Vec<&'a Setback> {
        let mut pool = Vec::new();
        for setback in catalog.iter().filter(|s| s.applies_to(level)) {
            let copies = setback.probability.div_ceil(self.weight_divisor);
            pool.extend(std::iter::repeat(setback).take(copies as usize));
        }
        pool
    }

    /// Possibly pick a setback for `level`.
    ///
    /// No setback applies to the level: `None` without drawing. Otherwise
    /// one draw decides whether a setback strikes and a second picks it.
    pub fn maybe_select<'a>(
        &self,
        level: Level,
        catalog: &'a [Setback],
        rng: &mut dyn RandomSource,
    ) -> Option<&'a Setback> {
        if !catalog.iter().any(|s| s.applies_to(level)) {
            return None;
        }
        let pool = self.weighted_pool(level, catalog);
        let roll = rng.next_unit() * 100.0;
        if roll >= self.appear_percent || pool.is_empty() {
            return None;
        }
        let picked = pool[rng.pick_index(pool.len())];
        log::info!("setback '{}' strikes at {}", picked.title, level);
        Some(picked)
    }
}

/// Result of advancing a countdown by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Running(u32),
    Expired,
}

/// Ticks remaining before a pending setback applies itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetbackCountdown {
    remaining: u32,
}

impl SetbackCountdown {
    pub fn new(ticks: u32) -> Self {
        Self { remaining: ticks }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> CountdownTick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            CountdownTick::Expired
        } else {
            CountdownTick::Running(self.remaining)
        }
    }
}
