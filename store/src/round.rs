//! Voting round storage trait.

use crate::StoreError;
use outlast_types::{ParticipantId, SessionId, Timestamp};
use serde::{Deserialize, Serialize};

/// One voting window within a session.
///
/// A round is "current" when `start_time <= now < end_time`. The
/// elimination and MVP fields stay `None` until the scheduler resolves the
/// round; once set they are never rewritten.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VotingRound {
    pub session_id: SessionId,
    pub round_number: u64,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub eliminated_participant: Option<ParticipantId>,
    pub mvp_participant: Option<ParticipantId>,
}

impl VotingRound {
    /// Whether the round's `[start, end)` window contains `now`.
    pub fn is_open(&self, now: Timestamp) -> bool {
        self.start_time <= now && now < self.end_time
    }

    /// Whether the round's voting window has elapsed.
    pub fn is_closed(&self, now: Timestamp) -> bool {
        now >= self.end_time
    }

    /// Whether the scheduler has already processed this round.
    pub fn is_resolved(&self) -> bool {
        self.eliminated_participant.is_some() || self.mvp_participant.is_some()
    }
}

/// Trait for voting round storage operations.
pub trait RoundStore {
    fn get_round(&self, session: &SessionId, number: u64) -> Result<VotingRound, StoreError>;
    fn put_round(&self, round: &VotingRound) -> Result<(), StoreError>;
    fn round_exists(&self, session: &SessionId, number: u64) -> Result<bool, StoreError>;

    /// Write the round's elimination/MVP outcome and apply the participant
    /// transitions in one atomic unit: the eliminated participant (if any)
    /// becomes `Eliminated` with `eliminated_at = now`, and the MVP's
    /// `mvp_count` is incremented. Either all writes land or none do.
    fn resolve_round(
        &self,
        session: &SessionId,
        number: u64,
        eliminated: Option<&ParticipantId>,
        mvp: Option<&ParticipantId>,
        now: Timestamp,
    ) -> Result<(), StoreError>;
}
