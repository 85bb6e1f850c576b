//! Service configuration
//!
//! Read from environment variables; malformed values fall back to defaults.
//!
//! - `TETRIS_HOST`: bind address (default: "127.0.0.1")
//! - `TETRIS_PORT`: port number (default: 5000)
//! - `TETRIS_LEADERBOARD_LIMIT`: default leaderboard size (default: 10)
//! - `TETRIS_SPRINT_TARGET`: lines needed to finish a sprint (default: 40)

use std::env;

use web_tetris_types::DEFAULT_SPRINT_TARGET_LINES;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub leaderboard_limit: usize,
    pub sprint_target: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            sprint_target: DEFAULT_SPRINT_TARGET_LINES,
        }
    }
}

impl ServiceConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("TETRIS_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);

        let port = lookup("TETRIS_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        let leaderboard_limit = lookup("TETRIS_LEADERBOARD_LIMIT")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&n: &usize| n > 0)
            .unwrap_or(defaults.leaderboard_limit);

        let sprint_target = lookup("TETRIS_SPRINT_TARGET")
            .and_then(|s| s.trim().parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(defaults.sprint_target);

        Self {
            host,
            port,
            leaderboard_limit,
            sprint_target,
        }
    }

    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
