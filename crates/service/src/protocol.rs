//! Protocol module - JSON message types for the game server
//!
//! Line-delimited JSON: one request per line, one response per line. Both
//! directions carry a `type` tag.
//!
//! ```text
//! Client -> Server: {"type":"start","player":"ann","mode":"sprint"}
//! Server -> Client: {"type":"state","success":true,"game_state":{...}}
//! Client -> Server: {"type":"action","player":"ann","action":"hard_drop"}
//! Server -> Client: {"type":"state","success":true,"game_state":{...}}
//! Client -> Server: {"type":"end","player":"ann"}
//! Server -> Client: {"type":"summary","final_score":36,"lines_cleared":0,"level":1,"time_played":4}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use web_tetris_core::{ActiveSnapshot, GameSnapshot, GameSummary, PieceSnapshot, ShapeGrid};
use web_tetris_types::{Achievement, GameAction, GameMode};

use crate::error::ServiceError;
use crate::persistence::{HighScoreRecord, PlayerStats};

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Start {
        player: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<String>,
    },
    Action {
        player: String,
        action: String,
    },
    Tick {
        player: String,
    },
    Snapshot {
        player: String,
    },
    End {
        player: String,
    },
    Leaderboard {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
    },
    Stats {
        player: String,
    },
}

impl Request {
    /// Player the request is about, if any
    pub fn player(&self) -> Option<&str> {
        match self {
            Request::Start { player, .. }
            | Request::Action { player, .. }
            | Request::Tick { player }
            | Request::Snapshot { player }
            | Request::End { player }
            | Request::Stats { player } => Some(player),
            Request::Leaderboard { .. } => None,
        }
    }
}

pub fn parse_request(json: &str) -> Result<Request, ServiceError> {
    serde_json::from_str(json).map_err(|e| ServiceError::InvalidRequest(e.to_string()))
}

/// Missing mode means a normal match
pub fn parse_mode(mode: Option<&str>) -> Result<GameMode, ServiceError> {
    match mode {
        None => Ok(GameMode::Normal),
        Some(name) => GameMode::from_str(name)
            .ok_or_else(|| ServiceError::InvalidRequest(format!("unknown mode: {name}"))),
    }
}

pub fn parse_action(action: &str) -> Result<GameAction, ServiceError> {
    GameAction::from_str(action)
        .ok_or_else(|| ServiceError::InvalidRequest(format!("unknown action: {action}")))
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    #[serde(rename = "type")]
    pub kind: String,
    pub shape: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePieceView {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i8,
    pub y: i8,
    pub rotation: i32,
    pub shape: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementView {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Wire view of a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    /// Rows top to bottom; 0 is empty, otherwise the ASCII code of the piece tag
    pub board: Vec<Vec<u8>>,
    pub current_piece: ActivePieceView,
    pub next_piece: PieceView,
    pub held_piece: Option<PieceView>,
    pub can_hold: bool,
    pub ghost_y: i8,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub combo_count: u32,
    pub max_combo: u32,
    pub perfect_clears: u32,
    pub total_pieces: u32,
    pub game_over: bool,
    pub piece_stats: BTreeMap<String, u32>,
    pub game_mode: String,
    /// Newly unlocked by the check that produced this view
    pub achievements: Vec<AchievementView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_target: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_complete: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    State {
        success: bool,
        game_state: Box<GameStateView>,
    },
    Summary {
        final_score: u32,
        lines_cleared: u32,
        level: u32,
        time_played: u64,
    },
    Leaderboard {
        scores: Vec<HighScoreRecord>,
    },
    Stats {
        stats: PlayerStats,
    },
    Error {
        code: String,
        message: String,
    },
}

impl Response {
    pub fn state(success: bool, snapshot: &GameSnapshot) -> Self {
        Response::State {
            success,
            game_state: Box::new(build_view(snapshot)),
        }
    }

    pub fn summary(summary: &GameSummary) -> Self {
        Response::Summary {
            final_score: summary.score,
            lines_cleared: summary.lines_cleared,
            level: summary.level,
            time_played: summary.time_played_secs,
        }
    }

    pub fn error(err: &ServiceError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

fn shape_rows(shape: &ShapeGrid) -> Vec<Vec<u8>> {
    shape
        .iter()
        .map(|row| row.iter().map(|&filled| u8::from(filled)).collect())
        .collect()
}

fn piece_view(piece: &PieceSnapshot) -> PieceView {
    PieceView {
        kind: piece.kind.as_str().to_string(),
        shape: shape_rows(&piece.shape),
    }
}

fn active_view(piece: &ActiveSnapshot) -> ActivePieceView {
    ActivePieceView {
        kind: piece.kind.as_str().to_string(),
        x: piece.x,
        y: piece.y,
        rotation: piece.rotation,
        shape: shape_rows(&piece.shape),
    }
}

fn achievement_view(achievement: Achievement) -> AchievementView {
    AchievementView {
        id: achievement.id().to_string(),
        name: achievement.name().to_string(),
        description: achievement.description().to_string(),
    }
}

/// Build the wire view of a snapshot
pub fn build_view(snapshot: &GameSnapshot) -> GameStateView {
    let board = snapshot
        .board
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.map(|kind| kind.marker()).unwrap_or(0))
                .collect()
        })
        .collect();

    let piece_stats = snapshot
        .piece_stats
        .iter()
        .map(|(kind, count)| (kind.as_str().to_string(), count))
        .collect();

    let sprint = snapshot.sprint.as_ref();

    GameStateView {
        board,
        current_piece: active_view(&snapshot.current),
        next_piece: piece_view(&snapshot.next),
        held_piece: snapshot.held.as_ref().map(piece_view),
        can_hold: snapshot.can_hold,
        ghost_y: snapshot.ghost_y,
        score: snapshot.score,
        level: snapshot.level,
        lines_cleared: snapshot.lines_cleared,
        combo_count: snapshot.combo,
        max_combo: snapshot.max_combo,
        perfect_clears: snapshot.perfect_clears,
        total_pieces: snapshot.total_pieces,
        game_over: snapshot.game_over,
        piece_stats,
        game_mode: snapshot.mode.as_str().to_string(),
        achievements: snapshot
            .achievements
            .iter()
            .copied()
            .map(achievement_view)
            .collect(),
        sprint_time_ms: sprint
            .and_then(|s| s.elapsed)
            .map(|elapsed| elapsed.as_millis() as u64),
        sprint_target: sprint.map(|s| s.target_lines),
        sprint_complete: sprint.map(|s| s.complete),
    }
}
