//! Web Tetris (workspace facade crate).
//!
//! Re-exports the workspace crates under short names; the implementation lives
//! in dedicated crates under `crates/`.

pub use web_tetris_core as core;
pub use web_tetris_service as service;
pub use web_tetris_types as types;
