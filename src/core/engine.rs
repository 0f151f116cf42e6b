/// The top-level engine: holds loaded content and config, and starts
/// game sessions. Built via `GameEngine::builder()`.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::{ConfigError, EngineConfig};
use crate::core::content::{ContentError, GameContent};
use crate::core::random::{RandomSource, StdRandom};
use crate::core::session::GameSession;
use crate::schema::client::ClientId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("content error: {0}")]
    Content(#[from] ContentError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

pub struct GameEngine {
    content: Arc<GameContent>,
    config: EngineConfig,
    seed: Option<u64>,
    sessions_started: u64,
}

/// Builder for constructing a `GameEngine`.
pub struct GameEngineBuilder {
    seed: Option<u64>,
    content_dir: Option<String>,
    config_path: Option<String>,
    /// Directly provided content (for testing without files).
    content: Option<GameContent>,
    /// Directly provided config; a config file takes precedence.
    config: Option<EngineConfig>,
}

impl GameEngine {
    pub fn builder() -> GameEngineBuilder {
        GameEngineBuilder {
            seed: None,
            content_dir: None,
            config_path: None,
            content: None,
            config: None,
        }
    }

    pub fn content(&self) -> &GameContent {
        &self.content
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a session for a randomly drawn client.
    pub fn start_session(&mut self) -> GameSession {
        let rng = self.next_rng();
        GameSession::new(Arc::clone(&self.content), self.config.clone(), rng)
    }

    /// Start a session for a known client.
    pub fn start_session_for(&mut self, client_id: ClientId) -> GameSession {
        let rng = self.next_rng();
        GameSession::with_client(Arc::clone(&self.content), self.config.clone(), rng, client_id)
    }

    /// Seeded engines hand each session its own derived seed, so sessions
    /// started in the same order replay identically.
    fn next_rng(&mut self) -> Box<dyn RandomSource> {
        let index = self.sessions_started;
        self.sessions_started += 1;
        match self.seed {
            Some(seed) => Box::new(StdRandom::new(seed.wrapping_add(index))),
            None => Box::new(StdRandom::from_entropy()),
        }
    }
}

impl GameEngineBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Directory whose RON files override the built-in content.
    pub fn content_dir(mut self, path: &str) -> Self {
        self.content_dir = Some(path.to_string());
        self
    }

    pub fn config_file(mut self, path: &str) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_content(mut self, content: GameContent) -> Self {
        self.content = Some(content);
        self
    }

    pub fn build(self) -> Result<GameEngine, EngineError> {
        let content = match (self.content, &self.content_dir) {
            (Some(content), _) => {
                content.validate()?;
                content
            }
            (None, Some(dir)) => GameContent::load_dir(Path::new(dir))?,
            (None, None) => GameContent::builtin()?,
        };

        let config = match &self.config_path {
            Some(path) => EngineConfig::load_from_ron(Path::new(path))?,
            None => {
                let config = self.config.unwrap_or_default();
                config.validate()?;
                config
            }
        };

        log::info!(
            "engine ready: {} curated events, {} setbacks, mode {:?}",
            content.events.len(),
            content.setbacks.len(),
            config.event_mode
        );

        Ok(GameEngine {
            content: Arc::new(content),
            config,
            seed: self.seed,
            sessions_started: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::EventMode;

    #[test]
    fn builds_with_builtin_content() {
        let engine = GameEngine::builder().seed(1).build().unwrap();
        assert_eq!(engine.content().events.len(), 9);
        assert_eq!(engine.config(), &EngineConfig::default());
    }

    #[test]
    fn seeded_engines_replay_sessions() {
        let mut a = GameEngine::builder().seed(42).build().unwrap();
        let mut b = GameEngine::builder().seed(42).build().unwrap();
        let sa = a.start_session();
        let sb = b.start_session();
        assert_eq!(sa.state(), sb.state());
        assert_eq!(sa.current_event().title, sb.current_event().title);
        assert_eq!(sa.client(), sb.client());
    }

    #[test]
    fn explicit_config_is_validated() {
        let bad = EngineConfig {
            countdown_ticks: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            GameEngine::builder().config(bad).build(),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn provided_content_is_validated() {
        let mut content = GameContent::builtin().unwrap();
        content.outcomes.poor.clear();
        assert!(matches!(
            GameEngine::builder().with_content(content).build(),
            Err(EngineError::Content(_))
        ));
    }

    #[test]
    fn curated_config_reaches_sessions() {
        let config = EngineConfig {
            event_mode: EventMode::Curated,
            ..EngineConfig::default()
        };
        let mut engine = GameEngine::builder().seed(3).config(config).build().unwrap();
        let session = engine.start_session_for(ClientId(8));
        assert!(!session.current_event().is_free_text());
        assert_eq!(session.state().client_id, ClientId(8));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let result = GameEngine::builder().config_file("tests/fixtures/no_such_config.ron").build();
        assert!(matches!(result, Err(EngineError::Config(ConfigError::Io(_)))));
    }
}
