//! Nullable store — thread-safe in-memory storage for testing.
//!
//! Implements every `outlast-store` trait. A single mutex guards all
//! collections, which gives the same atomicity the LMDB backend gets from
//! its single-writer lock: vote check-then-insert and round resolution are
//! indivisible.

use outlast_store::participant::{Participant, ParticipantStore};
use outlast_store::round::{RoundStore, VotingRound};
use outlast_store::session::{GameSession, SessionStore};
use outlast_store::user::{User, UserStore};
use outlast_store::vote::{Vote, VoteStore};
use outlast_store::StoreError;
use outlast_types::{
    Fid, ParticipantId, ParticipantStatus, SessionId, SessionStatus, Timestamp, VoteCategory,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

type VoteKey = (SessionId, u64, u8, Fid);

#[derive(Default)]
struct Inner {
    users: BTreeMap<u64, User>,
    sessions: BTreeMap<SessionId, GameSession>,
    rounds: BTreeMap<(SessionId, u64), VotingRound>,
    participants: BTreeMap<ParticipantId, Participant>,
    votes: BTreeMap<VoteKey, Vote>,
}

/// An in-memory store for testing.
pub struct NullStore {
    inner: Mutex<Inner>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for NullStore {
    fn get_user(&self, fid: Fid) -> Result<User, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .users
            .get(&fid.as_u64())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {fid}")))
    }

    fn put_user(&self, user: &User) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(user.fid.as_u64(), user.clone());
        Ok(())
    }

    fn user_exists(&self, fid: Fid) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().users.contains_key(&fid.as_u64()))
    }

    fn touch_last_active(&self, fid: Fid, now: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(&fid.as_u64())
            .ok_or_else(|| StoreError::NotFound(format!("user {fid}")))?;
        user.last_active = now;
        Ok(())
    }

    fn set_nft_verified(&self, fid: Fid, verified: bool, now: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(&fid.as_u64())
            .ok_or_else(|| StoreError::NotFound(format!("user {fid}")))?;
        user.nft_verified = verified;
        user.last_nft_check = Some(now);
        Ok(())
    }
}

impl SessionStore for NullStore {
    fn get_session(&self, id: &SessionId) -> Result<GameSession, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .sessions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("session {id}")))
    }

    fn put_session(&self, session: &GameSession) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .sessions
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn active_session(&self) -> Result<Option<GameSession>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .sessions
            .values()
            .find(|s| s.status == SessionStatus::Active)
            .cloned())
    }

    fn set_current_round(&self, id: &SessionId, round: u64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("session {id}")))?;
        session.current_round = round;
        Ok(())
    }

    fn set_session_status(&self, id: &SessionId, status: SessionStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let session = inner
            .sessions
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("session {id}")))?;
        session.status = status;
        Ok(())
    }
}

impl RoundStore for NullStore {
    fn get_round(&self, session: &SessionId, number: u64) -> Result<VotingRound, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .rounds
            .get(&(session.clone(), number))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("round {number} of session {session}")))
    }

    fn put_round(&self, round: &VotingRound) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .rounds
            .insert((round.session_id.clone(), round.round_number), round.clone());
        Ok(())
    }

    fn round_exists(&self, session: &SessionId, number: u64) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rounds
            .contains_key(&(session.clone(), number)))
    }

    fn resolve_round(
        &self,
        session: &SessionId,
        number: u64,
        eliminated: Option<&ParticipantId>,
        mvp: Option<&ParticipantId>,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let round = inner
            .rounds
            .get(&(session.clone(), number))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("round {number} of session {session}")))?;
        if round.eliminated_participant.is_some() || round.mvp_participant.is_some() {
            return Ok(());
        }

        if let Some(id) = eliminated {
            let participant = inner
                .participants
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("participant {id}")))?;
            if participant.status == ParticipantStatus::Active {
                participant.status = ParticipantStatus::Eliminated;
                participant.eliminated_at = Some(now);
            }
        }
        if let Some(id) = mvp {
            let participant = inner
                .participants
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(format!("participant {id}")))?;
            participant.mvp_count += 1;
        }

        let stored = inner
            .rounds
            .get_mut(&(session.clone(), number))
            .expect("round checked above");
        stored.eliminated_participant = eliminated.cloned();
        stored.mvp_participant = mvp.cloned();
        Ok(())
    }
}

impl ParticipantStore for NullStore {
    fn get_participant(&self, id: &ParticipantId) -> Result<Participant, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .participants
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("participant {id}")))
    }

    fn put_participant(&self, participant: &Participant) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .participants
            .insert(participant.id.clone(), participant.clone());
        Ok(())
    }

    fn participants_in(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError> {
        // BTreeMap iteration is already ordered by participant id.
        Ok(self
            .inner
            .lock()
            .unwrap()
            .participants
            .values()
            .filter(|p| &p.session_id == session)
            .cloned()
            .collect())
    }
}

impl VoteStore for NullStore {
    fn try_insert_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let key = (
            vote.session_id.clone(),
            vote.round_number,
            vote.category.as_byte(),
            vote.voter,
        );
        if inner.votes.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "vote ({}, round {}, {})",
                vote.voter, vote.round_number, vote.category
            )));
        }
        inner.votes.insert(key, vote.clone());
        Ok(())
    }

    fn votes_for_round(&self, session: &SessionId, round: u64) -> Result<Vec<Vote>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .votes
            .values()
            .filter(|v| &v.session_id == session && v.round_number == round)
            .cloned()
            .collect())
    }

    fn categories_voted(
        &self,
        session: &SessionId,
        round: u64,
        voter: Fid,
    ) -> Result<Vec<VoteCategory>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(VoteCategory::ALL
            .into_iter()
            .filter(|cat| {
                inner
                    .votes
                    .contains_key(&(session.clone(), round, cat.as_byte(), voter))
            })
            .collect())
    }

    fn votes_for_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<Vote>, StoreError> {
        let mut votes: Vec<Vote> = self
            .inner
            .lock()
            .unwrap()
            .votes
            .values()
            .filter(|v| &v.participant == participant)
            .cloned()
            .collect();
        votes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(votes)
    }
}
