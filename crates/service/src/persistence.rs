//! Persistence gateway - high score records and per-player aggregates
//!
//! The service only talks to the [`PersistenceGateway`] trait. It appends one
//! record when a match ends and queries the leaderboard and player stats
//! independently. [`InMemoryGateway`] keeps everything in process memory.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use web_tetris_core::GameSummary;

/// One finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub player: String,
    pub score: u32,
    pub lines_cleared: u32,
    pub level_reached: u32,
    pub time_played_secs: u64,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over every recorded match of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub games_played: u32,
    pub total_score: u64,
    pub total_lines_cleared: u64,
    pub total_time_played_secs: u64,
    pub best_score: u32,
    pub best_level: u32,
}

impl PlayerStats {
    fn absorb(&mut self, record: &HighScoreRecord) {
        self.games_played += 1;
        self.total_score += u64::from(record.score);
        self.total_lines_cleared += u64::from(record.lines_cleared);
        self.total_time_played_secs += record.time_played_secs;
        self.best_score = self.best_score.max(record.score);
        self.best_level = self.best_level.max(record.level_reached);
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("score storage lock poisoned")]
    Poisoned,
    #[error("storage backend failed: {0}")]
    Backend(String),
}

pub trait PersistenceGateway: Send + Sync {
    /// Append the final numbers of a finished match
    fn record_score(
        &self,
        player: &str,
        summary: &GameSummary,
    ) -> Result<HighScoreRecord, PersistenceError>;

    /// Best `limit` records, highest score first; ties go to the earlier record
    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreRecord>, PersistenceError>;

    /// Aggregates for `player`; all zero when nothing has been recorded
    fn player_stats(&self, player: &str) -> Result<PlayerStats, PersistenceError>;
}

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    records: Mutex<Vec<HighScoreRecord>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn record_score(
        &self,
        player: &str,
        summary: &GameSummary,
    ) -> Result<HighScoreRecord, PersistenceError> {
        let record = HighScoreRecord {
            player: player.to_string(),
            score: summary.score,
            lines_cleared: summary.lines_cleared,
            level_reached: summary.level,
            time_played_secs: summary.time_played_secs,
            created_at: Utc::now(),
        };

        let mut records = self.records.lock().map_err(|_| PersistenceError::Poisoned)?;
        records.push(record.clone());
        debug!(player, score = record.score, "score recorded");
        Ok(record)
    }

    fn leaderboard(&self, limit: usize) -> Result<Vec<HighScoreRecord>, PersistenceError> {
        let records = self.records.lock().map_err(|_| PersistenceError::Poisoned)?;
        let mut top = records.clone();
        drop(records);

        // Stable sort keeps insertion order for identical timestamps.
        top.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        top.truncate(limit);
        Ok(top)
    }

    fn player_stats(&self, player: &str) -> Result<PlayerStats, PersistenceError> {
        let records = self.records.lock().map_err(|_| PersistenceError::Poisoned)?;
        let mut stats = PlayerStats::default();
        for record in records.iter().filter(|r| r.player == player) {
            stats.absorb(record);
        }
        Ok(stats)
    }
}
