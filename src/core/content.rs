/// Static game content: keyword tables, flavor text, question pools,
/// curated events, setbacks and client name pools.
///
/// Content is read-only once loaded. A built-in copy is compiled into the
/// crate; a content directory may override any of its files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::taxonomy::KeywordTaxonomy;
use crate::schema::event::{Category, GameEvent};
use crate::schema::level::PerLevel;
use crate::schema::setback::Setback;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid content: {0}")]
    Invalid(String),
}

mod builtin {
    pub const KEYWORDS: &str = include_str!("../../content/keywords.ron");
    pub const OUTCOMES: &str = include_str!("../../content/outcomes.ron");
    pub const QUESTIONS: &str = include_str!("../../content/questions.ron");
    pub const EVENTS: &str = include_str!("../../content/events.ron");
    pub const SETBACKS: &str = include_str!("../../content/setbacks.ron");
    pub const CLIENTS: &str = include_str!("../../content/clients.ron");
}

/// Flavor messages shown after an evaluated answer, one pool per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMessages {
    pub excellent: Vec<String>,
    pub good: Vec<String>,
    pub average: Vec<String>,
    pub poor: Vec<String>,
    pub harmful: Vec<String>,
    pub ineffective: Vec<String>,
}

impl OutcomeMessages {
    pub fn pool(&self, category: Category) -> &[String] {
        match category {
            Category::Excellent => &self.excellent,
            Category::Good => &self.good,
            Category::Average => &self.average,
            Category::Poor => &self.poor,
            Category::Harmful => &self.harmful,
            Category::Ineffective => &self.ineffective,
        }
    }
}

/// A client background: `trait_phrase` then `context` complete the sentence
/// "Your client {name} is {trait_phrase} {context}."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Situation {
    pub trait_phrase: String,
    pub context: String,
}

/// The four independent pools the question generator samples for a level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionPools {
    pub situations: Vec<Situation>,
    pub titles: Vec<String>,
    pub challenges: Vec<String>,
    pub prompts: Vec<String>,
}

/// Name and attribute pools for generated client profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientPools {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub family_responsibilities: Vec<String>,
}

/// Everything the engine reads but never mutates.
#[derive(Debug, Clone, Default)]
pub struct GameContent {
    pub keywords: KeywordTaxonomy,
    pub outcomes: OutcomeMessages,
    pub questions: PerLevel<QuestionPools>,
    pub events: Vec<GameEvent>,
    pub setbacks: Vec<Setback>,
    pub clients: ClientPools,
}

impl GameContent {
    /// The content compiled into the crate.
    pub fn builtin() -> Result<GameContent, ContentError> {
        let content = GameContent {
            keywords: KeywordTaxonomy::parse_ron(builtin::KEYWORDS)?,
            outcomes: ron::from_str(builtin::OUTCOMES)?,
            questions: ron::from_str(builtin::QUESTIONS)?,
            events: ron::from_str(builtin::EVENTS)?,
            setbacks: ron::from_str(builtin::SETBACKS)?,
            clients: ron::from_str(builtin::CLIENTS)?,
        };
        content.validate()?;
        Ok(content)
    }

    /// Built-in content with any of `keywords.ron`, `outcomes.ron`,
    /// `questions.ron`, `events.ron`, `setbacks.ron`, `clients.ron` found in
    /// `dir` replacing the corresponding table.
    pub fn load_dir(dir: &Path) -> Result<GameContent, ContentError> {
        let mut content = Self::builtin()?;
        let file = |name: &str| {
            let path = dir.join(name);
            path.exists().then_some(path)
        };

        if let Some(path) = file("keywords.ron") {
            content.keywords = KeywordTaxonomy::load_from_ron(&path)?;
        }
        if let Some(path) = file("outcomes.ron") {
            content.outcomes = read_ron(&path)?;
        }
        if let Some(path) = file("questions.ron") {
            content.questions = read_ron(&path)?;
        }
        if let Some(path) = file("events.ron") {
            content.events = read_ron(&path)?;
        }
        if let Some(path) = file("setbacks.ron") {
            content.setbacks = read_ron(&path)?;
        }
        if let Some(path) = file("clients.ron") {
            content.clients = read_ron(&path)?;
        }

        content.validate()?;
        Ok(content)
    }

    /// Reject content the engine cannot play with: empty sampling pools,
    /// positive setback impacts, duplicate curated event ids.
    pub fn validate(&self) -> Result<(), ContentError> {
        for (level, pools) in self.questions.iter() {
            if pools.situations.is_empty()
                || pools.titles.is_empty()
                || pools.challenges.is_empty()
                || pools.prompts.is_empty()
            {
                return Err(ContentError::Invalid(format!(
                    "question pools for {} must all be non-empty",
                    level
                )));
            }
        }

        for category in Category::ALL {
            if self.outcomes.pool(category).is_empty() {
                return Err(ContentError::Invalid(format!(
                    "no outcome messages for category '{}'",
                    category
                )));
            }
        }

        if self.clients.first_names.is_empty() || self.clients.last_names.is_empty() {
            return Err(ContentError::Invalid(
                "client name pools must be non-empty".to_string(),
            ));
        }

        for setback in &self.setbacks {
            if setback.health_impact > 0 || setback.progress_impact > 0 {
                return Err(ContentError::Invalid(format!(
                    "setback {} has a positive impact",
                    setback.id
                )));
            }
            if setback.probability > 100 {
                return Err(ContentError::Invalid(format!(
                    "setback {} probability {} exceeds 100",
                    setback.id, setback.probability
                )));
            }
        }

        let mut seen = rustc_hash::FxHashSet::default();
        for event in &self.events {
            if !seen.insert(event.id) {
                return Err(ContentError::Invalid(format!(
                    "duplicate curated event id {}",
                    event.id
                )));
            }
        }

        Ok(())
    }
}

fn read_ron<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::level::Level;

    #[test]
    fn builtin_content_loads() {
        let content = GameContent::builtin().unwrap();
        for level in Level::ALL {
            let pools = content.questions.get(level);
            assert_eq!(pools.situations.len(), 8);
            assert_eq!(pools.titles.len(), 8);
            assert_eq!(pools.challenges.len(), 12);
            assert_eq!(pools.prompts.len(), 10);
        }
        assert_eq!(content.events.len(), 9);
        assert_eq!(content.setbacks.len(), 15);
        assert_eq!(content.clients.first_names.len(), 8);
    }

    #[test]
    fn builtin_keywords_cover_every_level() {
        let content = GameContent::builtin().unwrap();
        for level in Level::ALL {
            let group = content.keywords.group(level);
            for category in Category::KEYWORD_TIERS {
                assert!(
                    !group.keywords(category).is_empty(),
                    "{} has no {} keywords",
                    level,
                    category
                );
            }
        }
        assert!(content
            .keywords
            .group(Level::Awareness)
            .excellent
            .contains(&"subsidies".to_string()));
    }

    #[test]
    fn curated_events_carry_options() {
        let content = GameContent::builtin().unwrap();
        for event in &content.events {
            assert_eq!(event.options.len(), 3, "event {}", event.id);
            assert!(event.health_impact < 0);
        }
        let per_level = |level| content.events.iter().filter(|e| e.level == level).count();
        assert_eq!(per_level(Level::Awareness), 3);
        assert_eq!(per_level(Level::Enrollment), 3);
        assert_eq!(per_level(Level::Utilization), 3);
    }

    #[test]
    fn validate_rejects_positive_setback() {
        let mut content = GameContent::builtin().unwrap();
        content.setbacks[0].health_impact = 5;
        assert!(matches!(content.validate(), Err(ContentError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_empty_prompts() {
        let mut content = GameContent::builtin().unwrap();
        content.questions.enrollment.prompts.clear();
        assert!(content.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_event_ids() {
        let mut content = GameContent::builtin().unwrap();
        let dup = content.events[0].clone();
        content.events.push(dup);
        assert!(content.validate().is_err());
    }

    #[test]
    fn load_dir_without_overrides_matches_builtin() {
        let content = GameContent::load_dir(Path::new("tests/fixtures/empty_dir_that_does_not_exist"))
            .unwrap();
        assert_eq!(content.setbacks.len(), 15);
    }

    #[test]
    fn load_dir_overrides_setbacks() {
        let content = GameContent::load_dir(Path::new("tests/fixtures/content")).unwrap();
        assert_eq!(content.setbacks.len(), 1);
        assert_eq!(content.setbacks[0].title, "Fixture Setback");
        // untouched tables fall back to the built-in copy
        assert_eq!(content.events.len(), 9);
    }
}
