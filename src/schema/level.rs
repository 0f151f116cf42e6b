use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level index {0} is out of range (expected 0, 1 or 2)")]
    OutOfRange(usize),
}

/// One of the three sequential game stages.
///
/// Serialized as its index (0, 1, 2) so saved games and content files
/// stay compatible with the numeric level field of the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    Awareness,
    Enrollment,
    Utilization,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Awareness, Level::Enrollment, Level::Utilization];

    pub fn index(self) -> usize {
        match self {
            Self::Awareness => 0,
            Self::Enrollment => 1,
            Self::Utilization => 2,
        }
    }

    /// Fails fast on anything outside {0, 1, 2}.
    pub fn from_index(index: usize) -> Result<Level, LevelError> {
        match index {
            0 => Ok(Self::Awareness),
            1 => Ok(Self::Enrollment),
            2 => Ok(Self::Utilization),
            other => Err(LevelError::OutOfRange(other)),
        }
    }

    /// The following stage, or `None` from the last one.
    pub fn next(self) -> Option<Level> {
        match self {
            Self::Awareness => Some(Self::Enrollment),
            Self::Enrollment => Some(Self::Utilization),
            Self::Utilization => None,
        }
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    /// Display name: "Awareness", "Enrollment", "Utilization".
    pub fn name(self) -> &'static str {
        match self {
            Self::Awareness => "Awareness",
            Self::Enrollment => "Enrollment",
            Self::Utilization => "Utilization",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::from_index(value as usize)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.index() as u8
    }
}

/// Where the client stands with their coverage. Moves forward only,
/// in lockstep with the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InsuranceStatus {
    #[default]
    Uninsured,
    #[serde(rename = "Shopping for Plans")]
    ShoppingForPlans,
    Insured,
}

impl InsuranceStatus {
    /// Status reached on entering `level`.
    pub fn for_level(level: Level) -> InsuranceStatus {
        match level {
            Level::Awareness => Self::Uninsured,
            Level::Enrollment => Self::ShoppingForPlans,
            Level::Utilization => Self::Insured,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Uninsured => "Uninsured",
            Self::ShoppingForPlans => "Shopping for Plans",
            Self::Insured => "Insured",
        }
    }
}

impl fmt::Display for InsuranceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value kept separately for each level, as laid out in content files:
/// `(awareness: .., enrollment: .., utilization: ..)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerLevel<T> {
    pub awareness: T,
    pub enrollment: T,
    pub utilization: T,
}

impl<T> PerLevel<T> {
    pub fn get(&self, level: Level) -> &T {
        match level {
            Level::Awareness => &self.awareness,
            Level::Enrollment => &self.enrollment,
            Level::Utilization => &self.utilization,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Level, &T)> {
        Level::ALL.into_iter().map(move |level| (level, self.get(level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_index(level.index()).unwrap(), level);
        }
    }

    #[test]
    fn out_of_range_fails_fast() {
        assert_eq!(Level::from_index(3), Err(LevelError::OutOfRange(3)));
        assert!(Level::try_from(7u8).is_err());
    }

    #[test]
    fn next_stops_at_utilization() {
        assert_eq!(Level::Awareness.next(), Some(Level::Enrollment));
        assert_eq!(Level::Enrollment.next(), Some(Level::Utilization));
        assert_eq!(Level::Utilization.next(), None);
        assert!(Level::Utilization.is_final());
    }

    #[test]
    fn level_serializes_as_index() {
        assert_eq!(serde_json::to_string(&Level::Enrollment).unwrap(), "1");
        let parsed: Level = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Level::Utilization);
        assert!(serde_json::from_str::<Level>("5").is_err());
    }

    #[test]
    fn insurance_status_labels() {
        assert_eq!(
            serde_json::to_string(&InsuranceStatus::ShoppingForPlans).unwrap(),
            "\"Shopping for Plans\""
        );
        assert_eq!(InsuranceStatus::for_level(Level::Utilization), InsuranceStatus::Insured);
        assert_eq!(InsuranceStatus::default(), InsuranceStatus::Uninsured);
    }

    #[test]
    fn per_level_lookup() {
        let table = PerLevel {
            awareness: "a",
            enrollment: "e",
            utilization: "u",
        };
        assert_eq!(*table.get(Level::Enrollment), "e");
        let collected: Vec<_> = table.iter().map(|(l, v)| (l.index(), *v)).collect();
        assert_eq!(collected, vec![(0, "a"), (1, "e"), (2, "u")]);
    }
}
