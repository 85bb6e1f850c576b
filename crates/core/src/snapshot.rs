use std::time::Duration;

use crate::game_state::Tetromino;
use crate::pieces::{get_shape, ShapeGrid};
use crate::scoring::ScoreResult;
use crate::types::{Achievement, Cell, GameMode, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Board contents, row-major, top row first
pub type BoardGrid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// Placement counts per piece kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PieceStats {
    counts: [u32; PieceKind::COUNT],
}

impl PieceStats {
    pub fn record(&mut self, kind: PieceKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn get(&self, kind: PieceKind) -> u32 {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        PieceKind::ALL.iter().map(|&kind| (kind, self.get(kind)))
    }
}

/// A queued or held piece: kind plus its spawn shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub shape: ShapeGrid,
}

impl From<PieceKind> for PieceSnapshot {
    fn from(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: *get_shape(kind, 0),
        }
    }
}

/// The falling piece: kind, anchor, running rotation and current shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub x: i8,
    pub y: i8,
    pub rotation: i32,
    pub shape: ShapeGrid,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            x: value.x,
            y: value.y,
            rotation: value.rotation,
            shape: *value.shape(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintSnapshot {
    /// None until the first piece has been placed
    pub elapsed: Option<Duration>,
    pub target_lines: u32,
    pub complete: bool,
}

/// Immutable view of a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub board: BoardGrid,
    pub current: ActiveSnapshot,
    pub next: PieceSnapshot,
    pub held: Option<PieceSnapshot>,
    pub ghost_y: i8,
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub perfect_clears: u32,
    pub total_pieces: u32,
    pub piece_stats: PieceStats,
    pub game_over: bool,
    pub mode: GameMode,
    /// Only present in sprint mode
    pub sprint: Option<SprintSnapshot>,
    /// Achievements unlocked by the check that produced this snapshot
    pub achievements: Vec<Achievement>,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        !self.game_over
    }
}

/// Outcome of the most recent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub perfect_clear: bool,
    pub combo: u32,
    pub score: ScoreResult,
}

/// Final numbers handed to persistence when a match ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub lines_cleared: u32,
    pub level: u32,
    pub time_played_secs: u64,
}
