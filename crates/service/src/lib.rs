//! Service layer - sessions, persistence and the JSON/TCP front end
//!
//! Glue around the core engine: one match per player in a [`SessionStore`],
//! final scores handed to a [`PersistenceGateway`], and a line-delimited JSON
//! protocol served over TCP.
//!
//! # Requests
//!
//! - **start**: begin a match (`mode` is `normal` or `sprint`)
//! - **action**: `left`, `right`, `rotate`, `down`, `hard_drop`, `hold`
//! - **tick**: gravity step (one soft drop)
//! - **snapshot**: current state without changing it
//! - **end**: record the score and drop the match
//! - **leaderboard** / **stats**: read back recorded scores
//!
//! See [`protocol`] for message structures and [`server`] for the TCP loop.

pub mod config;
pub mod error;
pub mod game_service;
pub mod persistence;
pub mod protocol;
pub mod server;
pub mod session;

pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use game_service::{ActionOutcome, GameService};
pub use persistence::{
    HighScoreRecord, InMemoryGateway, PersistenceError, PersistenceGateway, PlayerStats,
};
pub use protocol::{parse_request, GameStateView, Request, Response};
pub use server::{handle_line, handle_request, run_server, MAX_LINE_BYTES};
pub use session::{PlayerId, SessionStore};
