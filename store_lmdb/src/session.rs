//! LMDB implementation of SessionStore.

use outlast_store::session::{GameSession, SessionStore};
use outlast_store::StoreError;
use outlast_types::{SessionId, SessionStatus};

use crate::environment::LmdbStore;
use crate::LmdbError;

impl LmdbStore {
    fn read_session(&self, id: &SessionId) -> Result<GameSession, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let bytes = self
            .sessions_db
            .get(&rtxn, id.as_str().as_bytes())?
            .ok_or_else(|| LmdbError::NotFound(format!("session {id}")))?;
        Ok(bincode::deserialize(bytes)?)
    }

    fn write_session(&self, session: &GameSession) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(session)?;
        let mut wtxn = self.env.write_txn()?;
        self.sessions_db
            .put(&mut wtxn, session.id.as_str().as_bytes(), &bytes)?;
        wtxn.commit()?;
        Ok(())
    }
}

impl SessionStore for LmdbStore {
    fn get_session(&self, id: &SessionId) -> Result<GameSession, StoreError> {
        Ok(self.read_session(id)?)
    }

    fn put_session(&self, session: &GameSession) -> Result<(), StoreError> {
        Ok(self.write_session(session)?)
    }

    fn active_session(&self) -> Result<Option<GameSession>, StoreError> {
        // The sessions collection stays tiny (one row per game run), so a
        // full scan is fine here.
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.sessions_db.iter(&rtxn).map_err(LmdbError::from)?;
        for entry in iter {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            let session: GameSession =
                bincode::deserialize(bytes).map_err(LmdbError::from)?;
            if session.status == SessionStatus::Active {
                return Ok(Some(session));
            }
        }
        Ok(None)
    }

    fn set_current_round(&self, id: &SessionId, round: u64) -> Result<(), StoreError> {
        let mut session = self.read_session(id)?;
        session.current_round = round;
        Ok(self.write_session(&session)?)
    }

    fn set_session_status(&self, id: &SessionId, status: SessionStatus) -> Result<(), StoreError> {
        let mut session = self.read_session(id)?;
        session.status = status;
        Ok(self.write_session(&session)?)
    }
}
