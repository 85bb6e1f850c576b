use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use web_tetris_core::GameState;

use crate::error::{ServiceError, ServiceResult};

pub type PlayerId = String;

pub type SharedMatch = Arc<Mutex<GameState>>;

/// Active matches keyed by player.
///
/// At most one match per player. The per-match mutex is the serialization
/// point for that player's operations; the outer lock is only held long enough
/// to look the match up.
#[derive(Debug, Default)]
pub struct SessionStore {
    matches: RwLock<HashMap<PlayerId, SharedMatch>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a match for `player`, returning the one it replaced
    pub fn insert(&self, player: &str, game: GameState) -> ServiceResult<Option<SharedMatch>> {
        let mut guard = self
            .matches
            .write()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        Ok(guard.insert(player.to_string(), Arc::new(Mutex::new(game))))
    }

    pub fn get(&self, player: &str) -> ServiceResult<Option<SharedMatch>> {
        let guard = self
            .matches
            .read()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        Ok(guard.get(player).cloned())
    }

    /// Run `f` against the player's match while holding its lock
    pub fn with_match<T>(
        &self,
        player: &str,
        f: impl FnOnce(&mut GameState) -> T,
    ) -> ServiceResult<T> {
        let shared = self
            .get(player)?
            .ok_or_else(|| ServiceError::NoActiveGame(player.to_string()))?;
        let mut game = shared.lock().map_err(|_| ServiceError::StoragePoisoned)?;
        Ok(f(&mut game))
    }

    pub fn remove(&self, player: &str) -> ServiceResult<Option<SharedMatch>> {
        let mut guard = self
            .matches
            .write()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        Ok(guard.remove(player))
    }

    /// Whether `shared` is still the match stored for `player`
    pub fn is_current(&self, player: &str, shared: &SharedMatch) -> ServiceResult<bool> {
        Ok(self
            .get(player)?
            .is_some_and(|stored| Arc::ptr_eq(&stored, shared)))
    }

    /// Evict the player's match only if it is still `shared`.
    ///
    /// A match started after `shared` was looked up is left alone.
    pub fn remove_if(&self, player: &str, shared: &SharedMatch) -> ServiceResult<bool> {
        let mut guard = self
            .matches
            .write()
            .map_err(|_| ServiceError::StoragePoisoned)?;
        match guard.get(player) {
            Some(stored) if Arc::ptr_eq(stored, shared) => {
                guard.remove(player);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn contains(&self, player: &str) -> bool {
        self.matches
            .read()
            .map(|guard| guard.contains_key(player))
            .unwrap_or(false)
    }

    /// Players with a match in the store, sorted
    pub fn active_players(&self) -> Vec<PlayerId> {
        match self.matches.read() {
            Ok(guard) => {
                let mut players: Vec<PlayerId> = guard.keys().cloned().collect();
                players.sort();
                players
            }
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.matches.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_tetris_types::GameMode;

    #[test]
    fn insert_replaces_previous_match() {
        let store = SessionStore::new();
        assert!(store.insert("ann", GameState::start(GameMode::Normal)).unwrap().is_none());
        store
            .with_match("ann", |game| {
                game.hard_drop();
            })
            .unwrap();

        let previous = store.insert("ann", GameState::start(GameMode::Sprint)).unwrap();
        assert!(previous.is_some());
        assert_eq!(store.len(), 1);

        let (mode, pieces) = store
            .with_match("ann", |game| (game.mode(), game.total_pieces()))
            .unwrap();
        assert_eq!(mode, GameMode::Sprint);
        assert_eq!(pieces, 0);
    }

    #[test]
    fn missing_player_is_reported() {
        let store = SessionStore::new();
        let err = store.with_match("ghost", |game| game.score()).unwrap_err();
        assert_eq!(err, ServiceError::NoActiveGame("ghost".into()));
        assert!(!store.contains("ghost"));
    }

    #[test]
    fn remove_and_list() {
        let store = SessionStore::new();
        store.insert("cy", GameState::start(GameMode::Normal)).unwrap();
        store.insert("ann", GameState::start(GameMode::Normal)).unwrap();
        assert_eq!(store.active_players(), vec!["ann".to_string(), "cy".to_string()]);

        assert!(store.remove("ann").unwrap().is_some());
        assert!(store.remove("ann").unwrap().is_none());
        assert!(!store.contains("ann"));
        assert!(store.contains("cy"));
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn remove_if_leaves_newer_match() {
        let store = SessionStore::new();
        store.insert("ann", GameState::start(GameMode::Normal)).unwrap();
        let old = store.get("ann").unwrap().unwrap();
        assert!(store.is_current("ann", &old).unwrap());

        store.insert("ann", GameState::start(GameMode::Sprint)).unwrap();
        assert!(!store.is_current("ann", &old).unwrap());
        assert!(!store.remove_if("ann", &old).unwrap());
        assert!(store.contains("ann"));

        let new = store.get("ann").unwrap().unwrap();
        assert!(store.remove_if("ann", &new).unwrap());
        assert!(!store.contains("ann"));
        assert!(!store.is_current("ann", &new).unwrap());
    }
}
