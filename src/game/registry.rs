//! In-process registry of running games, keyed by name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use ulid::Ulid;

use crate::game::config::GameConfig;
use crate::game::error::{GameError, GameResult};
use crate::game::game::Game;

/// Holds every open game by name. Clone to share; each game sits behind its
/// own mutex so play in one game never blocks another.
#[derive(Debug, Clone, Default)]
pub struct GameRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<Game>>>>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game under the given name, or under a generated ulid when
    /// no name is supplied. Returns the name actually used.
    pub fn create(&self, name: Option<String>, config: &GameConfig) -> GameResult<String> {
        let name = name.unwrap_or_else(|| Ulid::new().to_string().to_lowercase());

        let mut games = self.inner.write();
        if games.contains_key(&name) {
            return Err(GameError::GameAlreadyExists(name));
        }

        let game = Game::new(name.clone(), config)?;
        games.insert(name.clone(), Arc::new(Mutex::new(game)));
        Ok(name)
    }

    pub fn get(&self, name: &str) -> GameResult<Arc<Mutex<Game>>> {
        self.inner
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| GameError::GameNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    /// All game names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Drop a game from the registry. Existing handles keep working; the
    /// game just can't be looked up anymore.
    pub fn remove(&self, name: &str) -> GameResult<()> {
        self.inner
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| GameError::GameNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
