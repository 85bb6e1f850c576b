use thiserror::Error;

use crate::persistence::PersistenceError;

/// Failures surfaced to callers of the game service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("no active game for player {0}")]
    NoActiveGame(String),
    #[error("game is over for player {0}")]
    GameOver(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("failed to persist score: {0}")]
    Persistence(String),
    #[error("session storage poisoned")]
    StoragePoisoned,
}

impl ServiceError {
    /// Stable wire code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NoActiveGame(_) => "no_active_game",
            ServiceError::GameOver(_) => "game_over",
            ServiceError::InvalidRequest(_) => "invalid_request",
            ServiceError::Persistence(_) => "persistence_error",
            ServiceError::StoragePoisoned => "internal_error",
        }
    }
}

impl From<PersistenceError> for ServiceError {
    fn from(err: PersistenceError) -> Self {
        ServiceError::Persistence(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
