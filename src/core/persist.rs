/// Saved games: the versioned JSON envelope and the stores that hold it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::state::GameState;

/// Version written into every save. Loading any other version fails.
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save version {found} is not supported (expected {expected})")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("invalid save identifier '{0}'")]
    InvalidIdentifier(String),
    #[error("save '{0}' holds an out-of-range game state")]
    InconsistentState(String),
}

/// What gets written for one saved game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedGame {
    pub version: u32,
    pub username: String,
    pub game_state: GameState,
}

impl SavedGame {
    pub fn new(username: &str, game_state: GameState) -> Self {
        Self {
            version: SAVE_VERSION,
            username: username.to_string(),
            game_state,
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a save and check its version.
    pub fn from_json(input: &str) -> Result<SavedGame, PersistError> {
        let saved: SavedGame = serde_json::from_str(input)?;
        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }
        Ok(saved)
    }
}

/// Where serialized saves live. Stores deal in opaque strings.
pub trait SaveStore {
    fn save(&mut self, identifier: &str, serialized: &str) -> Result<(), PersistError>;

    /// `Ok(None)` when nothing is saved under `identifier`.
    fn load(&self, identifier: &str) -> Result<Option<String>, PersistError>;
}

/// Keeps saves in a map for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saves: FxHashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.saves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, identifier: &str, serialized: &str) -> Result<(), PersistError> {
        self.saves.insert(identifier.to_string(), serialized.to_string());
        Ok(())
    }

    fn load(&self, identifier: &str) -> Result<Option<String>, PersistError> {
        Ok(self.saves.get(identifier).cloned())
    }
}

/// One `<identifier>.json` file per save inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates `dir` if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, identifier: &str) -> Result<PathBuf, PersistError> {
        let valid = !identifier.is_empty()
            && identifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PersistError::InvalidIdentifier(identifier.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", identifier)))
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, identifier: &str, serialized: &str) -> Result<(), PersistError> {
        let path = self.path_for(identifier)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    fn load(&self, identifier: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(identifier)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::client::ClientId;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hne-persist-{}-{}", name, std::process::id()))
    }

    #[test]
    fn envelope_layout() {
        let saved = SavedGame::new("casey", GameState::new(ClientId(9)));
        let json: serde_json::Value = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["username"], "casey");
        assert_eq!(json["gameState"]["clientId"], 9);
        assert_eq!(json["gameState"]["turn"], 1);
    }

    #[test]
    fn rejects_other_versions() {
        let mut saved = SavedGame::new("casey", GameState::new(ClientId(9)));
        saved.version = 7;
        let json = serde_json::to_string(&saved).unwrap();
        assert!(matches!(
            SavedGame::from_json(&json),
            Err(PersistError::VersionMismatch { expected: 1, found: 7 })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(SavedGame::from_json("{not json"), Err(PersistError::Json(_))));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load("a").unwrap(), None);
        store.save("a", "payload").unwrap();
        store.save("a", "newer").unwrap();
        assert_eq!(store.load("a").unwrap().as_deref(), Some("newer"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_store_round_trip() {
        let dir = temp_dir("round-trip");
        let mut store = JsonFileStore::new(&dir).unwrap();
        assert_eq!(store.load("slot_1").unwrap(), None);
        store.save("slot_1", "{\"x\":1}").unwrap();
        assert_eq!(store.load("slot_1").unwrap().as_deref(), Some("{\"x\":1}"));
        assert!(dir.join("slot_1.json").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_rejects_path_like_identifiers() {
        let dir = temp_dir("identifiers");
        let mut store = JsonFileStore::new(&dir).unwrap();
        for bad in ["", "../escape", "a/b", "name.json", "sp ace"] {
            assert!(
                matches!(store.save(bad, "{}"), Err(PersistError::InvalidIdentifier(_))),
                "accepted '{}'",
                bad
            );
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
