//! Core game logic - pure, synchronous and testable
//!
//! This crate holds every rule of a match: the board, the shape tables, piece
//! generation, scoring and achievements. It has no networking, persistence or
//! rendering; the service crate drives it.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid with collision checks and line clearing
//! - [`pieces`]: rotation tables for the ten piece kinds (no wall kicks)
//! - [`rng`]: uniform piece draws behind the [`PieceSource`] trait
//! - [`clock`]: time source for match and sprint timers
//! - [`scoring`]: line clear, combo, perfect clear and drop points
//! - [`achievements`]: one-shot milestones checked on every snapshot
//! - [`game_state`]: the match itself and all player operations
//! - [`snapshot`]: immutable views handed to the outside
//!
//! # Game Rules
//!
//! - **Uniform draws**: every piece is an independent choice over all ten kinds
//! - **Plain rotation**: rotation steps through a fixed list; blocked rotations fail
//! - **Hard drop**: 2 points per row descended
//! - **Combo**: consecutive clearing locks; the first empty lock resets it
//! - **Hold**: once per lock
//! - **Levels**: one per ten lines, capped at 10
//!
//! # Example
//!
//! ```
//! use web_tetris_core::rng::SequenceSource;
//! use web_tetris_core::clock::ManualClock;
//! use web_tetris_core::GameState;
//! use web_tetris_types::{GameAction, GameMode, PieceKind};
//!
//! let mut game = GameState::with_sources(
//!     GameMode::Normal,
//!     SequenceSource::repeat(PieceKind::T),
//!     ManualClock::new(),
//! );
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! assert_eq!(game.total_pieces(), 1);
//! ```

pub mod achievements;
pub mod board;
pub mod clock;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use web_tetris_types as types;

// Re-export commonly used types for convenience
pub use achievements::AchievementTracker;
pub use board::Board;
pub use clock::{Clock, ManualClock, SystemClock};
pub use game_state::{GameState, Tetromino};
pub use pieces::{get_shape, ShapeGrid};
pub use rng::{PieceSource, SequenceSource, SimpleRng, ThreadRandom};
pub use scoring::{calculate_drop_score, calculate_score, ScoreResult};
pub use snapshot::{
    ActiveSnapshot, BoardGrid, GameSnapshot, GameSummary, LockEvent, PieceSnapshot, PieceStats,
    SprintSnapshot,
};
