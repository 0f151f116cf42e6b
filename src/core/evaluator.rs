/// Response evaluator: scores free-text answers by keyword containment
/// and maps them onto a category and its fixed effect bundle.

use serde::{Deserialize, Serialize};

use crate::core::content::OutcomeMessages;
use crate::core::random::{choose, RandomSource};
use crate::core::taxonomy::{KeywordCounts, KeywordTaxonomy};
use crate::schema::event::{Category, EffectBundle, EventOption};
use crate::schema::level::Level;

/// Id given to options synthesized from free-text answers.
pub const FREE_TEXT_OPTION_ID: u32 = 99;

/// Free-text answers longer than this are shortened for display.
const OPTION_TEXT_LIMIT: usize = 50;

const EXCELLENT_THRESHOLD: i32 = 13;
const GOOD_THRESHOLD: i32 = 8;
const AVERAGE_THRESHOLD: i32 = 4;

/// The result of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub category: Category,
    pub effects: EffectBundle,
    pub outcome_message: String,
    pub counts: KeywordCounts,
    pub weighted_score: i32,
}

/// Select a category from keyword counts and the failure roll.
///
/// Precedence: failure roll, then two or more harmful hits, then the score
/// thresholds, then a single harmful hit, then poor. A lone harmful phrase
/// only decides the outcome when the score has already fallen below the
/// average threshold.
pub fn classify(counts: &KeywordCounts, failure_roll: f64, ineffective_chance: f64) -> Category {
    let score = counts.weighted_score();
    if failure_roll < ineffective_chance {
        Category::Ineffective
    } else if counts.harmful >= 2 {
        Category::Harmful
    } else if score >= EXCELLENT_THRESHOLD {
        Category::Excellent
    } else if score >= GOOD_THRESHOLD {
        Category::Good
    } else if score >= AVERAGE_THRESHOLD {
        Category::Average
    } else if counts.harmful >= 1 {
        Category::Harmful
    } else {
        Category::Poor
    }
}

/// Scores answers against a keyword taxonomy.
#[derive(Debug, Clone, Copy)]
pub struct ResponseEvaluator<'a> {
    taxonomy: &'a KeywordTaxonomy,
    outcomes: &'a OutcomeMessages,
    ineffective_chance: f64,
}

impl<'a> ResponseEvaluator<'a> {
    pub fn new(
        taxonomy: &'a KeywordTaxonomy,
        outcomes: &'a OutcomeMessages,
        ineffective_chance: f64,
    ) -> Self {
        Self {
            taxonomy,
            outcomes,
            ineffective_chance,
        }
    }

    /// Evaluate `text` against the taxonomy for `level`.
    ///
    /// Draws twice from `rng`: first the failure roll, then the flavor
    /// message. Never fails; rejecting blank answers is the caller's job.
    pub fn evaluate(&self, text: &str, level: Level, rng: &mut dyn RandomSource) -> Evaluation {
        let normalized = text.to_lowercase();
        let counts = self.taxonomy.count(&normalized, level);
        let category = classify(&counts, rng.next_unit(), self.ineffective_chance);
        let outcome_message = choose(rng, self.outcomes.pool(category))
            .cloned()
            .unwrap_or_default();

        log::debug!(
            "evaluated answer at {}: {:?} score={} -> {}",
            level,
            counts,
            counts.weighted_score(),
            category
        );

        Evaluation {
            category,
            effects: category.effects(),
            outcome_message,
            counts,
            weighted_score: counts.weighted_score(),
        }
    }
}

/// Turn an evaluated free-text answer into an option the turn machine can
/// apply. The text is cut to 50 characters plus "..." when longer.
pub fn option_from_evaluation(text: &str, evaluation: &Evaluation) -> EventOption {
    let display = if text.chars().count() > OPTION_TEXT_LIMIT {
        let head: String = text.chars().take(OPTION_TEXT_LIMIT).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    };
    EventOption::with_effects(
        FREE_TEXT_OPTION_ID,
        display,
        evaluation.effects,
        evaluation.outcome_message.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::GameContent;
    use crate::core::random::ScriptedRandom;

    fn counts(excellent: u32, good: u32, average: u32, poor: u32, harmful: u32) -> KeywordCounts {
        KeywordCounts {
            excellent,
            good,
            average,
            poor,
            harmful,
        }
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(classify(&counts(3, 0, 0, 0, 0), 0.5, 0.1), Category::Excellent);
        assert_eq!(classify(&counts(2, 1, 0, 0, 0), 0.5, 0.1), Category::Excellent);
        assert_eq!(classify(&counts(2, 0, 0, 0, 0), 0.5, 0.1), Category::Good);
        assert_eq!(classify(&counts(0, 2, 2, 0, 0), 0.5, 0.1), Category::Good);
        assert_eq!(classify(&counts(0, 1, 1, 0, 0), 0.5, 0.1), Category::Average);
        assert_eq!(classify(&counts(0, 1, 0, 0, 0), 0.5, 0.1), Category::Poor);
        assert_eq!(classify(&counts(0, 0, 0, 0, 0), 0.5, 0.1), Category::Poor);
    }

    #[test]
    fn failure_roll_overrides_perfect_answer() {
        assert_eq!(classify(&counts(9, 9, 9, 0, 0), 0.05, 0.1), Category::Ineffective);
        assert_eq!(classify(&counts(9, 9, 9, 0, 0), 0.1, 0.1), Category::Excellent);
    }

    #[test]
    fn two_harmful_beats_any_score() {
        assert_eq!(classify(&counts(10, 0, 0, 0, 2), 0.9, 0.1), Category::Harmful);
    }

    #[test]
    fn single_harmful_only_below_average_threshold() {
        assert_eq!(classify(&counts(1, 0, 0, 0, 1), 0.9, 0.1), Category::Average);
        assert_eq!(classify(&counts(0, 1, 0, 0, 1), 0.9, 0.1), Category::Harmful);
        assert_eq!(classify(&counts(3, 0, 0, 0, 1), 0.9, 0.1), Category::Excellent);
    }

    #[test]
    fn premium_deductible_subsidies_is_excellent() {
        let content = GameContent::builtin().unwrap();
        let evaluator = ResponseEvaluator::new(&content.keywords, &content.outcomes, 0.1);
        let mut rng = ScriptedRandom::new(vec![0.5, 0.0]);
        let eval = evaluator.evaluate(
            "I'll explain the premium, deductible, and subsidies available",
            Level::Awareness,
            &mut rng,
        );
        assert!(eval.counts.excellent >= 3);
        assert!(eval.weighted_score >= 15);
        assert_eq!(eval.category, Category::Excellent);
        assert_eq!(eval.effects, EffectBundle::new(18, 22, 22, 35, 0));
        assert_eq!(eval.outcome_message, content.outcomes.excellent[0]);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn evaluation_is_case_insensitive() {
        let content = GameContent::builtin().unwrap();
        let evaluator = ResponseEvaluator::new(&content.keywords, &content.outcomes, 0.1);
        let mut rng = ScriptedRandom::new(vec![0.5]);
        let eval = evaluator.evaluate("PREMIUM DEDUCTIBLE COPAY", Level::Awareness, &mut rng);
        assert_eq!(eval.counts.excellent, 3);
        assert_eq!(eval.category, Category::Excellent);
    }

    #[test]
    fn harmful_advice_at_enrollment() {
        let content = GameContent::builtin().unwrap();
        let evaluator = ResponseEvaluator::new(&content.keywords, &content.outcomes, 0.1);
        let mut rng = ScriptedRandom::new(vec![0.99, 0.4]);
        let eval = evaluator.evaluate(
            "Just lie about income and skip enrollment this year, compare plans later",
            Level::Enrollment,
            &mut rng,
        );
        assert_eq!(eval.counts.harmful, 2);
        assert_eq!(eval.category, Category::Harmful);
        assert_eq!(eval.effects.turn, 1);
        assert_eq!(eval.outcome_message, content.outcomes.harmful[1]);
    }

    #[test]
    fn random_failure_uses_ineffective_pool() {
        let content = GameContent::builtin().unwrap();
        let evaluator = ResponseEvaluator::new(&content.keywords, &content.outcomes, 0.1);
        let mut rng = ScriptedRandom::new(vec![0.01, 0.9]);
        let eval = evaluator.evaluate("prior authorization appeal process", Level::Utilization, &mut rng);
        assert_eq!(eval.category, Category::Ineffective);
        assert_eq!(eval.outcome_message, content.outcomes.ineffective[2]);
    }

    #[test]
    fn every_answer_lands_in_a_category() {
        let content = GameContent::builtin().unwrap();
        let evaluator = ResponseEvaluator::new(&content.keywords, &content.outcomes, 0.1);
        let mut rng = crate::core::random::StdRandom::new(3);
        for text in ["", "???", "scam waste ignore", "help me pay the doctor", "gold silver bronze"] {
            for level in Level::ALL {
                let eval = evaluator.evaluate(text, level, &mut rng);
                assert!(Category::ALL.contains(&eval.category));
                assert!(!eval.outcome_message.is_empty());
            }
        }
    }

    #[test]
    fn option_from_short_answer_keeps_text() {
        let eval = Evaluation {
            category: Category::Good,
            effects: Category::Good.effects(),
            outcome_message: "Helpful.".to_string(),
            counts: KeywordCounts::default(),
            weighted_score: 9,
        };
        let option = option_from_evaluation("Compare the plans.", &eval);
        assert_eq!(option.id, FREE_TEXT_OPTION_ID);
        assert_eq!(option.text, "Compare the plans.");
        assert_eq!(option.score_effect, 25);
        assert_eq!(option.outcome, "Helpful.");
    }

    #[test]
    fn option_from_long_answer_is_truncated() {
        let eval = Evaluation {
            category: Category::Poor,
            effects: Category::Poor.effects(),
            outcome_message: String::new(),
            counts: KeywordCounts::default(),
            weighted_score: 0,
        };
        let text = "a".repeat(51);
        let option = option_from_evaluation(&text, &eval);
        assert_eq!(option.text, format!("{}...", "a".repeat(50)));

        let exact = "b".repeat(50);
        assert_eq!(option_from_evaluation(&exact, &eval).text, exact);
    }
}
