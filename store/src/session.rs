//! Game session storage trait.

use crate::StoreError;
use outlast_types::{SessionId, SessionStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// One run of the elimination game.
///
/// Invariant: at most one session has status `Active` at any time. Sessions
/// are created by an administrative action; `current_round` is advanced by
/// the elimination scheduler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,
    pub status: SessionStatus,
    pub current_round: u64,
    pub created_at: Timestamp,
}

/// Trait for game session storage operations.
pub trait SessionStore {
    fn get_session(&self, id: &SessionId) -> Result<GameSession, StoreError>;
    fn put_session(&self, session: &GameSession) -> Result<(), StoreError>;

    /// The session with status `Active`, or `None` if no game is running.
    fn active_session(&self) -> Result<Option<GameSession>, StoreError>;

    /// Advance the session's current round pointer.
    fn set_current_round(&self, id: &SessionId, round: u64) -> Result<(), StoreError>;

    /// Transition the session's status.
    fn set_session_status(&self, id: &SessionId, status: SessionStatus) -> Result<(), StoreError>;
}
