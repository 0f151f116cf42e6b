/// Keyword taxonomy: per-level trigger phrases for each response tier.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::content::ContentError;
use crate::schema::event::Category;
use crate::schema::level::{Level, PerLevel};

/// Trigger phrases for the five keyword-bearing categories of one level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub excellent: Vec<String>,
    pub good: Vec<String>,
    pub average: Vec<String>,
    pub poor: Vec<String>,
    pub harmful: Vec<String>,
}

impl KeywordGroup {
    /// Phrases for `category`. `Ineffective` has none.
    pub fn keywords(&self, category: Category) -> &[String] {
        match category {
            Category::Excellent => &self.excellent,
            Category::Good => &self.good,
            Category::Average => &self.average,
            Category::Poor => &self.poor,
            Category::Harmful => &self.harmful,
            Category::Ineffective => &[],
        }
    }
}

/// How many phrases of each tier were found in one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordCounts {
    pub excellent: u32,
    pub good: u32,
    pub average: u32,
    pub poor: u32,
    pub harmful: u32,
}

impl KeywordCounts {
    fn bump(&mut self, category: Category) {
        match category {
            Category::Excellent => self.excellent += 1,
            Category::Good => self.good += 1,
            Category::Average => self.average += 1,
            Category::Poor => self.poor += 1,
            Category::Harmful => self.harmful += 1,
            Category::Ineffective => {}
        }
    }

    /// `excellent*5 + good*3 + average - poor`. Harmful hits are not
    /// weighted; they only drive the harmful overrides.
    pub fn weighted_score(&self) -> i32 {
        self.excellent as i32 * 5 + self.good as i32 * 3 + self.average as i32
            - self.poor as i32
    }
}

/// The full three-level taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordTaxonomy {
    pub levels: PerLevel<KeywordGroup>,
}

impl KeywordTaxonomy {
    /// Load a taxonomy from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<KeywordTaxonomy, ContentError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a taxonomy from a RON string shaped
    /// `(awareness: (excellent: [..], ..), enrollment: .., utilization: ..)`.
    pub fn parse_ron(input: &str) -> Result<KeywordTaxonomy, ContentError> {
        let levels: PerLevel<KeywordGroup> = ron::from_str(input)?;
        Ok(KeywordTaxonomy { levels })
    }

    pub fn group(&self, level: Level) -> &KeywordGroup {
        self.levels.get(level)
    }

    /// Count phrase hits for `normalized` text (already lowercased).
    ///
    /// Each listed phrase contributes at most 1, however often it occurs
    /// in the text. A phrase listed twice in a tier counts twice.
    pub fn count(&self, normalized: &str, level: Level) -> KeywordCounts {
        let group = self.group(level);
        let mut counts = KeywordCounts::default();
        for category in Category::KEYWORD_TIERS {
            for keyword in group.keywords(category) {
                if normalized.contains(keyword.as_str()) {
                    counts.bump(category);
                }
            }
        }
        counts
    }
}
