//! Game service - maps player requests onto matches in the session store
//!
//! Every call names a player. Operations on one player's match are serialized
//! by the session store; different players never share state.

use std::sync::Arc;

use tracing::{debug, info, warn};
use web_tetris_core::{GameSnapshot, GameState, GameSummary, LockEvent};
use web_tetris_types::{GameAction, GameMode};

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::persistence::{HighScoreRecord, PersistenceGateway, PlayerStats};
use crate::session::SessionStore;

/// Result of applying one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    /// False when the action had no effect (blocked move, hold unavailable)
    pub applied: bool,
    /// Set when the action locked a piece
    pub lock: Option<LockEvent>,
    pub snapshot: GameSnapshot,
}

pub struct GameService {
    config: ServiceConfig,
    sessions: SessionStore,
    persistence: Arc<dyn PersistenceGateway>,
}

impl GameService {
    pub fn new(config: ServiceConfig, persistence: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
            persistence,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Start a fresh match, replacing any match the player already has
    pub fn start(&self, player: &str, mode: GameMode) -> ServiceResult<GameSnapshot> {
        let player = validate_player(player)?;

        let mut game = GameState::start(mode).with_sprint_target(self.config.sprint_target);
        let snapshot = game.snapshot();

        if self.sessions.insert(player, game)?.is_some() {
            info!(player, "replacing unfinished match");
        }
        info!(player, mode = mode.as_str(), "match started");

        Ok(snapshot)
    }

    pub fn apply(&self, player: &str, action: GameAction) -> ServiceResult<ActionOutcome> {
        self.sessions.with_match(player, |game| {
            if game.game_over() {
                return Err(ServiceError::GameOver(player.to_string()));
            }
            let applied = game.apply_action(action);
            let lock = take_lock(player, game);
            if game.game_over() {
                info!(player, score = game.score(), "match finished");
            }
            Ok(ActionOutcome {
                applied,
                lock,
                snapshot: game.snapshot(),
            })
        })?
    }

    /// Gravity step: one soft drop
    pub fn tick(&self, player: &str) -> ServiceResult<GameSnapshot> {
        self.sessions.with_match(player, |game| {
            if game.game_over() {
                return Err(ServiceError::GameOver(player.to_string()));
            }
            game.soft_drop();
            take_lock(player, game);
            Ok(game.snapshot())
        })?
    }

    pub fn snapshot(&self, player: &str) -> ServiceResult<GameSnapshot> {
        self.sessions.with_match(player, |game| game.snapshot())
    }

    /// Record the match and evict it.
    ///
    /// The match lock is held from the summary through the eviction, so a
    /// match is recorded once. If recording fails the match stays in the
    /// store so the call can be retried.
    pub fn end(&self, player: &str) -> ServiceResult<GameSummary> {
        let shared = self
            .sessions
            .get(player)?
            .ok_or_else(|| ServiceError::NoActiveGame(player.to_string()))?;
        let game = shared.lock().map_err(|_| ServiceError::StoragePoisoned)?;

        // Another end may have evicted it while we waited for the lock.
        if !self.sessions.is_current(player, &shared)? {
            return Err(ServiceError::NoActiveGame(player.to_string()));
        }

        let summary = game.summary();
        if let Err(err) = self.persistence.record_score(player, &summary) {
            warn!(player, error = %err, "failed to record score");
            return Err(err.into());
        }

        if !self.sessions.remove_if(player, &shared)? {
            debug!(player, "match replaced while ending, keeping the new one");
        }
        drop(game);

        info!(
            player,
            score = summary.score,
            lines = summary.lines_cleared,
            level = summary.level,
            "match ended"
        );
        Ok(summary)
    }

    /// Top scores; `None` uses the configured limit
    pub fn leaderboard(&self, limit: Option<usize>) -> ServiceResult<Vec<HighScoreRecord>> {
        let limit = limit.unwrap_or(self.config.leaderboard_limit);
        Ok(self.persistence.leaderboard(limit)?)
    }

    pub fn player_stats(&self, player: &str) -> ServiceResult<PlayerStats> {
        let player = validate_player(player)?;
        Ok(self.persistence.player_stats(player)?)
    }
}

fn take_lock(player: &str, game: &mut GameState) -> Option<LockEvent> {
    let event = game.take_last_event()?;
    if event.lines_cleared > 0 {
        debug!(
            player,
            lines = event.lines_cleared,
            combo = event.combo,
            perfect_clear = event.perfect_clear,
            points = event.score.total,
            "lines cleared"
        );
    }
    Some(event)
}

fn validate_player(player: &str) -> ServiceResult<&str> {
    if player.trim().is_empty() {
        return Err(ServiceError::InvalidRequest("player must not be empty".into()));
    }
    Ok(player)
}
