//! Game state module - manages the complete state of one match
//!
//! This module ties together the board, shape tables, piece source, scoring and
//! achievements. Every operation is a synchronous transition over a single
//! match; callers serialize access. Once `game_over` is set the match is
//! terminal and every mutating operation becomes a no-op returning failure.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::achievements::{AchievementInputs, AchievementTracker, SprintProgress};
use crate::clock::{Clock, SystemClock};
use crate::pieces::{self, Minos, ShapeGrid};
use crate::rng::{PieceSource, ThreadRandom};
use crate::scoring::{calculate_drop_score, calculate_level, calculate_score, ScoreResult};
use crate::snapshot::{
    ActiveSnapshot, GameSnapshot, GameSummary, LockEvent, PieceSnapshot, PieceStats,
    SprintSnapshot,
};
use crate::types::*;
use crate::Board;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    /// Running rotation counter; wrapped only when the shape is looked up
    pub rotation: i32,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new piece at the spawn anchor
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    /// Shape grid for the current rotation
    pub fn shape(&self) -> &'static ShapeGrid {
        pieces::get_shape(self.kind, self.rotation)
    }

    /// Occupied offsets for the current rotation
    pub fn minos(&self) -> Minos {
        pieces::minos(self.kind, self.rotation)
    }
}

/// Complete state of one match
#[derive(Debug, Clone)]
pub struct GameState<S = ThreadRandom, C = SystemClock> {
    board: Board,
    current: Tetromino,
    next: PieceKind,
    held: Option<PieceKind>,
    can_hold: bool,
    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    max_combo: u32,
    perfect_clears: u32,
    total_pieces: u32,
    piece_stats: PieceStats,
    /// Whether the most recent lock cleared at least one line.
    ///
    /// The combo only resets on the first empty lock after a clearing one.
    last_clear_had_lines: bool,
    last_score: ScoreResult,
    last_event: Option<LockEvent>,
    game_over: bool,
    mode: GameMode,
    sprint_target: u32,
    started_at: Instant,
    sprint_started_at: Option<Instant>,
    achievements: AchievementTracker,
    source: S,
    clock: C,
}

impl GameState {
    /// Start a match with the thread-local random source and the system clock
    pub fn start(mode: GameMode) -> Self {
        Self::with_sources(mode, ThreadRandom, SystemClock)
    }
}

impl<S: PieceSource, C: Clock> GameState<S, C> {
    /// Start a match drawing pieces from `source` and reading time from `clock`
    pub fn with_sources(mode: GameMode, mut source: S, clock: C) -> Self {
        let current = source.next_kind();
        let next = source.next_kind();
        let started_at = clock.now();

        debug!(mode = mode.as_str(), ?current, ?next, "match started");

        Self {
            board: Board::new(),
            current: Tetromino::new(current),
            next,
            held: None,
            can_hold: true,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            combo: 0,
            max_combo: 0,
            perfect_clears: 0,
            total_pieces: 0,
            piece_stats: PieceStats::default(),
            last_clear_had_lines: false,
            last_score: ScoreResult::default(),
            last_event: None,
            game_over: false,
            mode,
            sprint_target: DEFAULT_SPRINT_TARGET_LINES,
            started_at,
            sprint_started_at: None,
            achievements: AchievementTracker::new(),
            source,
            clock,
        }
    }

    /// Override the sprint line target (ignored outside sprint mode)
    pub fn with_sprint_target(mut self, lines: u32) -> Self {
        self.sprint_target = lines.max(1);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current(&self) -> Tetromino {
        self.current
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn perfect_clears(&self) -> u32 {
        self.perfect_clears
    }

    pub fn total_pieces(&self) -> u32 {
        self.total_pieces
    }

    pub fn piece_stats(&self) -> &PieceStats {
        &self.piece_stats
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn sprint_target(&self) -> u32 {
        self.sprint_target
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Check whether `kind` fits at anchor (x, y) with the given rotation.
    ///
    /// Every occupied cell must be inside the side walls and above the floor;
    /// cells on the board must be empty. Cells above the top edge are allowed.
    pub fn is_valid_position(&self, kind: PieceKind, x: i8, y: i8, rotation: i32) -> bool {
        pieces::minos(kind, rotation)
            .iter()
            .all(|&(dx, dy)| self.board.accepts(x + dx, y + dy))
    }

    /// Try to translate and/or rotate the current piece
    pub fn try_move(&mut self, dx: i8, dy: i8, rotation_delta: i32) -> bool {
        if self.game_over {
            return false;
        }

        let candidate = Tetromino {
            x: self.current.x + dx,
            y: self.current.y + dy,
            rotation: self.current.rotation + rotation_delta,
            ..self.current
        };

        if self.is_valid_position(candidate.kind, candidate.x, candidate.y, candidate.rotation) {
            self.current = candidate;
            return true;
        }

        false
    }

    /// Move the piece down one row, locking it if it is resting.
    ///
    /// Returns true if the piece moved, false if it locked (or the match is over).
    pub fn soft_drop(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.try_move(0, 1, 0) {
            return true;
        }
        self.lock_piece();
        false
    }

    /// Drop the piece until it locks and award two points per row descended.
    ///
    /// Returns the drop distance.
    pub fn hard_drop(&mut self) -> u32 {
        if self.game_over {
            return 0;
        }

        let mut distance: u32 = 0;
        while self.soft_drop() {
            distance += 1;
        }

        self.score = self.score.saturating_add(calculate_drop_score(distance));
        distance
    }

    /// Lock the current piece onto the board and bring in the next one
    pub fn lock_piece(&mut self) {
        if self.game_over {
            return;
        }

        let locked = self.current;
        self.board
            .stamp(&locked.minos(), locked.x, locked.y, locked.kind);

        let cleared = self.clear_lines();
        self.achievements.record_clear(cleared);

        self.piece_stats.record(locked.kind);
        self.total_pieces += 1;

        self.last_event = Some(LockEvent {
            kind: locked.kind,
            lines_cleared: cleared,
            perfect_clear: cleared > 0 && self.board.is_empty(),
            combo: self.combo,
            score: self.last_score,
        });

        let incoming = self.next;
        self.next = self.source.next_kind();
        self.current = Tetromino::new(incoming);
        self.can_hold = true;

        if self.mode == GameMode::Sprint
            && self.sprint_started_at.is_none()
            && self.total_pieces == 1
        {
            self.sprint_started_at = Some(self.clock.now());
        }

        self.check_spawn();
    }

    /// Remove every full row and apply line-clear scoring.
    ///
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let cleared = self.board.clear_full_rows().len() as u32;

        if cleared == 0 {
            if self.last_clear_had_lines {
                self.combo = 0;
            }
            self.last_clear_had_lines = false;
            self.last_score = ScoreResult::default();
            return 0;
        }

        self.last_clear_had_lines = true;
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);

        let perfect_clear = self.board.is_empty();
        if perfect_clear {
            self.perfect_clears += 1;
        }

        let result = calculate_score(cleared as usize, self.level, self.combo, perfect_clear);
        self.score = self.score.saturating_add(result.total);
        self.last_score = result;

        self.lines += cleared;
        self.level = calculate_level(self.lines);

        cleared
    }

    /// Stash the current piece, or swap it with the held one.
    ///
    /// Allowed once per lock. Returns false if not allowed, or if the incoming
    /// piece cannot spawn (which ends the match).
    pub fn hold(&mut self) -> bool {
        if self.game_over || !self.can_hold {
            return false;
        }

        let current_kind = self.current.kind;
        let incoming = match self.held {
            Some(held_kind) => held_kind,
            None => {
                let promoted = self.next;
                self.next = self.source.next_kind();
                promoted
            }
        };

        self.held = Some(current_kind);
        self.current = Tetromino::new(incoming);
        self.can_hold = false;

        self.check_spawn()
    }

    /// Lowest row the current piece can fall to from where it is
    pub fn ghost_y(&self) -> i8 {
        let piece = self.current;
        let mut y = piece.y;
        while self.is_valid_position(piece.kind, piece.x, y + 1, piece.rotation) {
            y += 1;
        }
        y
    }

    /// Elapsed sprint time; None outside sprint mode or before the first lock
    pub fn sprint_elapsed(&self) -> Option<Duration> {
        if self.mode != GameMode::Sprint {
            return None;
        }
        self.sprint_started_at
            .map(|start| self.clock.now().saturating_duration_since(start))
    }

    pub fn sprint_complete(&self) -> bool {
        self.mode == GameMode::Sprint && self.lines >= self.sprint_target
    }

    /// Return achievements that newly qualify, marking them unlocked
    pub fn check_achievements(&mut self) -> Vec<Achievement> {
        let sprint = match self.mode {
            GameMode::Sprint => Some(SprintProgress {
                target_lines: self.sprint_target,
                elapsed: self.sprint_elapsed(),
            }),
            GameMode::Normal => None,
        };

        let inputs = AchievementInputs {
            lines_cleared: self.lines,
            level: self.level,
            max_combo: self.max_combo,
            perfect_clears: self.perfect_clears,
            sprint,
        };

        self.achievements.evaluate(&inputs)
    }

    /// Build a snapshot of the match.
    ///
    /// Runs the achievement check; newly unlocked achievements are included.
    pub fn snapshot(&mut self) -> GameSnapshot {
        let achievements = self.check_achievements();

        let mut board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.board.write_grid(&mut board);

        let sprint = match self.mode {
            GameMode::Sprint => Some(SprintSnapshot {
                elapsed: self.sprint_elapsed(),
                target_lines: self.sprint_target,
                complete: self.sprint_complete(),
            }),
            GameMode::Normal => None,
        };

        GameSnapshot {
            board,
            current: ActiveSnapshot::from(self.current),
            next: PieceSnapshot::from(self.next),
            held: self.held.map(PieceSnapshot::from),
            ghost_y: self.ghost_y(),
            can_hold: self.can_hold,
            score: self.score,
            level: self.level,
            lines_cleared: self.lines,
            combo: self.combo,
            max_combo: self.max_combo,
            perfect_clears: self.perfect_clears,
            total_pieces: self.total_pieces,
            piece_stats: self.piece_stats,
            game_over: self.game_over,
            mode: self.mode,
            sprint,
            achievements,
        }
    }

    /// Final numbers for persistence
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.score,
            lines_cleared: self.lines,
            level: self.level,
            time_played_secs: self
                .clock
                .now()
                .saturating_duration_since(self.started_at)
                .as_secs(),
        }
    }

    /// Apply a player action. Returns false if it had no effect.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if self.game_over {
            return false;
        }

        match action {
            GameAction::MoveLeft => self.try_move(-1, 0, 0),
            GameAction::MoveRight => self.try_move(1, 0, 0),
            GameAction::Rotate => self.try_move(0, 0, 1),
            GameAction::SoftDrop => {
                self.soft_drop();
                true
            }
            GameAction::HardDrop => {
                self.hard_drop();
                true
            }
            GameAction::Hold => self.hold(),
        }
    }

    /// Check that the current piece fits at its spawn anchor, ending the match if not
    fn check_spawn(&mut self) -> bool {
        let piece = self.current;
        if self.is_valid_position(piece.kind, piece.x, piece.y, piece.rotation) {
            return true;
        }

        self.game_over = true;
        info!(
            score = self.score,
            lines = self.lines,
            level = self.level,
            blocked = piece.kind.as_str(),
            "game over"
        );
        false
    }
}
