//! Vote storage trait.
//!
//! Votes are immutable facts. The central correctness property of the whole
//! subsystem is enforced here: for a given (voter, session, round, category)
//! tuple at most one vote may exist, even under concurrent submission.

use crate::StoreError;
use outlast_types::{Fid, ParticipantId, SessionId, Timestamp, VoteCategory};
use serde::{Deserialize, Serialize};

/// A single cast vote.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vote {
    pub voter: Fid,
    pub participant: ParticipantId,
    pub category: VoteCategory,
    pub round_number: u64,
    pub session_id: SessionId,
    pub created_at: Timestamp,
}

/// Trait for vote storage operations.
pub trait VoteStore {
    /// Insert a vote, enforcing uniqueness on
    /// (voter, session, round, category).
    ///
    /// Implementations must make the existence check and the insert atomic
    /// with respect to concurrent calls for the same key: of N racing
    /// inserts exactly one succeeds and the rest fail with
    /// [`StoreError::Duplicate`].
    fn try_insert_vote(&self, vote: &Vote) -> Result<(), StoreError>;

    /// All votes cast in a round.
    fn votes_for_round(&self, session: &SessionId, round: u64) -> Result<Vec<Vote>, StoreError>;

    /// Categories a voter has already used in a round.
    fn categories_voted(
        &self,
        session: &SessionId,
        round: u64,
        voter: Fid,
    ) -> Result<Vec<VoteCategory>, StoreError> {
        let mut cats: Vec<VoteCategory> = self
            .votes_for_round(session, round)?
            .into_iter()
            .filter(|v| v.voter == voter)
            .map(|v| v.category)
            .collect();
        cats.sort();
        cats.dedup();
        Ok(cats)
    }

    /// All votes ever received by a participant, newest first.
    fn votes_for_participant(&self, participant: &ParticipantId)
        -> Result<Vec<Vote>, StoreError>;
}
