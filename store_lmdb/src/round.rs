//! LMDB implementation of RoundStore.
//!
//! `resolve_round` is the one multi-record mutation in the system: the
//! round outcome and the participant transitions land in a single LMDB
//! write transaction, so a crash mid-resolution leaves no partial state.

use outlast_store::participant::Participant;
use outlast_store::round::{RoundStore, VotingRound};
use outlast_store::StoreError;
use outlast_types::{ParticipantId, ParticipantStatus, SessionId, Timestamp};

use crate::environment::LmdbStore;
use crate::keys::round_key;
use crate::LmdbError;

impl LmdbStore {
    fn resolve_round_txn(
        &self,
        session: &SessionId,
        number: u64,
        eliminated: Option<&ParticipantId>,
        mvp: Option<&ParticipantId>,
        now: Timestamp,
    ) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;

        let key = round_key(session, number);
        let bytes = self
            .rounds_db
            .get(&wtxn, &key)?
            .ok_or_else(|| LmdbError::NotFound(format!("round {number} of session {session}")))?;
        let mut round: VotingRound = bincode::deserialize(bytes)?;

        // Already resolved: tolerate re-runs without rewriting anything.
        if round.eliminated_participant.is_some() || round.mvp_participant.is_some() {
            return Ok(());
        }

        if let Some(id) = eliminated {
            let pbytes = self
                .participants_db
                .get(&wtxn, id.as_str().as_bytes())?
                .ok_or_else(|| LmdbError::NotFound(format!("participant {id}")))?;
            let mut participant: Participant = bincode::deserialize(pbytes)?;
            // One-way transition: never un-eliminate.
            if participant.status == ParticipantStatus::Active {
                participant.status = ParticipantStatus::Eliminated;
                participant.eliminated_at = Some(now);
                self.participants_db.put(
                    &mut wtxn,
                    id.as_str().as_bytes(),
                    &bincode::serialize(&participant)?,
                )?;
            }
        }

        if let Some(id) = mvp {
            let pbytes = self
                .participants_db
                .get(&wtxn, id.as_str().as_bytes())?
                .ok_or_else(|| LmdbError::NotFound(format!("participant {id}")))?;
            let mut participant: Participant = bincode::deserialize(pbytes)?;
            participant.mvp_count += 1;
            self.participants_db.put(
                &mut wtxn,
                id.as_str().as_bytes(),
                &bincode::serialize(&participant)?,
            )?;
        }

        round.eliminated_participant = eliminated.cloned();
        round.mvp_participant = mvp.cloned();
        self.rounds_db
            .put(&mut wtxn, &key, &bincode::serialize(&round)?)?;

        wtxn.commit()?;
        Ok(())
    }
}

impl RoundStore for LmdbStore {
    fn get_round(&self, session: &SessionId, number: u64) -> Result<VotingRound, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .rounds_db
            .get(&rtxn, &round_key(session, number))
            .map_err(LmdbError::from)?
            .ok_or_else(|| {
                StoreError::NotFound(format!("round {number} of session {session}"))
            })?;
        bincode::deserialize(bytes).map_err(|e| LmdbError::from(e).into())
    }

    fn put_round(&self, round: &VotingRound) -> Result<(), StoreError> {
        let bytes = bincode::serialize(round).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.rounds_db
            .put(
                &mut wtxn,
                &round_key(&round.session_id, round.round_number),
                &bytes,
            )
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn round_exists(&self, session: &SessionId, number: u64) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .rounds_db
            .get(&rtxn, &round_key(session, number))
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn resolve_round(
        &self,
        session: &SessionId,
        number: u64,
        eliminated: Option<&ParticipantId>,
        mvp: Option<&ParticipantId>,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        Ok(self.resolve_round_txn(session, number, eliminated, mvp, now)?)
    }
}
