//! Game error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("no active game session")]
    NoActiveSession,

    #[error("no active voting round")]
    NoActiveRound,

    #[error("round {0} not found")]
    RoundNotFound(u64),

    #[error("invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("already voted for this category in this round")]
    DuplicateVote,

    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("store error: {0}")]
    Store(outlast_store::StoreError),
}

impl From<outlast_store::StoreError> for GameError {
    fn from(e: outlast_store::StoreError) -> Self {
        match e {
            outlast_store::StoreError::Duplicate(_) => GameError::DuplicateVote,
            other => GameError::Store(other),
        }
    }
}
