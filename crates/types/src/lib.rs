//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine, session service, wire protocol).
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn anchor**: (3, 0), i.e. `BOARD_WIDTH / 2 - 2` on the top row
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `LINE_SCORES` | `[0, 100, 300, 500, 800]` | Base points per clear, times level |
//! | `COMBO_BASE` | 50 | Combo bonus per combo step, times level |
//! | `PERFECT_CLEAR_BASE` | 3000 | Empty-board bonus, times level |
//! | `HARD_DROP_POINTS_PER_CELL` | 2 | Hard drop reward per cell descended |
//! | `MAX_LEVEL` | 10 | Level cap |
//! | `LINES_PER_LEVEL` | 10 | Lines needed per level step |
//!
//! # Examples
//!
//! ```
//! use web_tetris_types::{GameAction, GameMode, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! // Parse from string (case-insensitive)
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::A.marker(), b'A');
//!
//! // Parse actions with either spelling used by clients
//! assert_eq!(GameAction::from_str("hard_drop"), Some(GameAction::HardDrop));
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(GameMode::from_str("sprint"), Some(GameMode::Sprint));
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Spawn anchor column for every new piece
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Spawn anchor row for every new piece
pub const SPAWN_Y: i8 = 0;

/// Line clear scoring table, indexed by `min(lines, 4)` and multiplied by level
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Combo bonus per combo step (`COMBO_BASE * combo * level`)
pub const COMBO_BASE: u32 = 50;

/// Perfect clear bonus base (`PERFECT_CLEAR_BASE * level`)
pub const PERFECT_CLEAR_BASE: u32 = 3000;

/// Points per cell descended by a hard drop
pub const HARD_DROP_POINTS_PER_CELL: u32 = 2;

/// Starting level of every match
pub const START_LEVEL: u32 = 1;

/// Level cap
pub const MAX_LEVEL: u32 = 10;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Default line target for sprint matches
pub const DEFAULT_SPRINT_TARGET_LINES: u32 = 40;

/// Sprint time limit (seconds) for the `speed_demon` achievement
pub const SPEED_DEMON_LIMIT_SECS: u64 = 120;

/// The piece kinds of the game
///
/// The seven classic tetrominoes plus three custom shapes:
/// - **A**: three-cell corner piece (four rotations)
/// - **B**: single cell (one rotation)
/// - **C**: two-cell bar (two rotations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
    A,
    B,
    C,
}

impl PieceKind {
    /// Number of piece kinds
    pub const COUNT: usize = 10;

    /// Every piece kind, in declaration order
    pub const ALL: [PieceKind; Self::COUNT] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::A,
        PieceKind::B,
        PieceKind::C,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use web_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("C"), Some(PieceKind::C));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "I" => Some(PieceKind::I),
            "O" => Some(PieceKind::O),
            "T" => Some(PieceKind::T),
            "S" => Some(PieceKind::S),
            "Z" => Some(PieceKind::Z),
            "J" => Some(PieceKind::J),
            "L" => Some(PieceKind::L),
            "A" => Some(PieceKind::A),
            "B" => Some(PieceKind::B),
            "C" => Some(PieceKind::C),
            _ => None,
        }
    }

    /// One-letter uppercase tag
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::A => "A",
            PieceKind::B => "B",
            PieceKind::C => "C",
        }
    }

    /// Opaque board marker for a cell filled by this kind (ASCII code of the tag)
    pub fn marker(&self) -> u8 {
        self.as_str().as_bytes()[0]
    }

    /// Position in [`PieceKind::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Match mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    /// Endless play until the stack tops out
    #[default]
    Normal,
    /// Clear a target number of lines as fast as possible
    Sprint,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "sprint" => Some(GameMode::Sprint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Sprint => "sprint",
        }
    }
}

/// Player actions that can be applied to a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Advance to the next rotation state
    Rotate,
    /// Drop piece one cell down, locking it if it is resting
    SoftDrop,
    /// Drop piece to the lowest valid position and lock it
    HardDrop,
    /// Hold current piece (once per lock)
    Hold,
}

impl GameAction {
    /// Parse action from string
    ///
    /// Accepts the short names used by browser clients (`left`, `down`,
    /// `hard_drop`) as well as the camelCase names (`moveLeft`, `softDrop`).
    ///
    /// # Examples
    ///
    /// ```
    /// use web_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("down"), Some(GameAction::SoftDrop));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "moveleft" => Some(GameAction::MoveLeft),
            "right" | "moveright" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "down" | "softdrop" | "soft_drop" => Some(GameAction::SoftDrop),
            "hard_drop" | "harddrop" => Some(GameAction::HardDrop),
            "hold" => Some(GameAction::Hold),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Hold => "hold",
        }
    }
}

/// Achievements that can be unlocked once per match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Achievement {
    FirstLine,
    TetrisMaster,
    ComboKing,
    Perfectionist,
    Century,
    Survivor,
    SpeedDemon,
}

impl Achievement {
    pub const ALL: [Achievement; 7] = [
        Achievement::FirstLine,
        Achievement::TetrisMaster,
        Achievement::ComboKing,
        Achievement::Perfectionist,
        Achievement::Century,
        Achievement::Survivor,
        Achievement::SpeedDemon,
    ];

    /// Stable snake_case identifier
    pub fn id(&self) -> &'static str {
        match self {
            Achievement::FirstLine => "first_line",
            Achievement::TetrisMaster => "tetris_master",
            Achievement::ComboKing => "combo_king",
            Achievement::Perfectionist => "perfectionist",
            Achievement::Century => "century",
            Achievement::Survivor => "survivor",
            Achievement::SpeedDemon => "speed_demon",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Achievement::FirstLine => "First Line",
            Achievement::TetrisMaster => "Tetris Master",
            Achievement::ComboKing => "Combo King",
            Achievement::Perfectionist => "Perfectionist",
            Achievement::Century => "Century",
            Achievement::Survivor => "Survivor",
            Achievement::SpeedDemon => "Speed Demon",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Achievement::FirstLine => "Clear your first line",
            Achievement::TetrisMaster => "Clear four lines at once five times",
            Achievement::ComboKing => "Reach a combo of 5",
            Achievement::Perfectionist => "Clear the whole board",
            Achievement::Century => "Clear 100 lines",
            Achievement::Survivor => "Reach level 10",
            Achievement::SpeedDemon => "Finish a sprint in under two minutes",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by the specified piece kind
pub type Cell = Option<PieceKind>;
