//! Participant storage trait.

use crate::StoreError;
use outlast_types::{Fid, ParticipantId, ParticipantStatus, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

/// A competitor in the game, created at session setup.
///
/// Status is mutated only by the elimination scheduler, and only in the
/// direction `Active -> Eliminated`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub session_id: SessionId,
    pub user_fid: Fid,
    pub display_name: String,
    pub status: ParticipantStatus,
    pub eliminated_at: Option<Timestamp>,
    /// Times this participant was selected round MVP. Drives the leaderboard.
    pub mvp_count: u64,
}

impl Participant {
    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }
}

/// Trait for participant storage operations.
pub trait ParticipantStore {
    fn get_participant(&self, id: &ParticipantId) -> Result<Participant, StoreError>;
    fn put_participant(&self, participant: &Participant) -> Result<(), StoreError>;

    /// All participants of a session, ordered by participant id.
    fn participants_in(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError>;

    /// Participants of a session that are still active, ordered by id.
    fn active_participants(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError> {
        Ok(self
            .participants_in(session)?
            .into_iter()
            .filter(Participant::is_active)
            .collect())
    }
}
