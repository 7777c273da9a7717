//! LMDB implementation of ParticipantStore.

use outlast_store::participant::{Participant, ParticipantStore};
use outlast_store::StoreError;
use outlast_types::{ParticipantId, SessionId};

use crate::environment::LmdbStore;
use crate::keys::session_participant_key;
use crate::LmdbError;

impl ParticipantStore for LmdbStore {
    fn get_participant(&self, id: &ParticipantId) -> Result<Participant, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .participants_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .ok_or_else(|| StoreError::NotFound(format!("participant {id}")))?;
        bincode::deserialize(bytes).map_err(|e| LmdbError::from(e).into())
    }

    fn put_participant(&self, participant: &Participant) -> Result<(), StoreError> {
        let bytes = bincode::serialize(participant).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.participants_db
            .put(&mut wtxn, participant.id.as_str().as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        self.participants_by_session_db
            .put(
                &mut wtxn,
                &session_participant_key(&participant.session_id, &participant.id),
                participant.id.as_str().as_bytes(),
            )
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn participants_in(&self, session: &SessionId) -> Result<Vec<Participant>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut prefix = session.as_str().as_bytes().to_vec();
        prefix.push(0);

        let mut participants = Vec::new();
        let iter = self
            .participants_by_session_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for entry in iter {
            let (_, id_bytes) = entry.map_err(LmdbError::from)?;
            let bytes = self
                .participants_db
                .get(&rtxn, id_bytes)
                .map_err(LmdbError::from)?
                .ok_or_else(|| {
                    StoreError::Backend(format!(
                        "dangling participant index entry in session {session}"
                    ))
                })?;
            participants.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        // Index iteration order is already by participant id; keep the
        // promise explicit anyway.
        participants.sort_by(|a: &Participant, b: &Participant| a.id.cmp(&b.id));
        Ok(participants)
    }
}
