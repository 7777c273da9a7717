//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

/// Number of named databases in the environment.
const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles, and implements
/// every `outlast-store` trait.
pub struct LmdbStore {
    pub(crate) env: Arc<Env>,
    pub(crate) users_db: Database<Bytes, Bytes>,
    pub(crate) sessions_db: Database<Bytes, Bytes>,
    pub(crate) rounds_db: Database<Bytes, Bytes>,
    pub(crate) participants_db: Database<Bytes, Bytes>,
    pub(crate) participants_by_session_db: Database<Bytes, Bytes>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) votes_by_participant_db: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("create data dir: {e}")))?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let users_db = env.create_database(&mut wtxn, Some("users"))?;
        let sessions_db = env.create_database(&mut wtxn, Some("sessions"))?;
        let rounds_db = env.create_database(&mut wtxn, Some("rounds"))?;
        let participants_db = env.create_database(&mut wtxn, Some("participants"))?;
        let participants_by_session_db =
            env.create_database(&mut wtxn, Some("participants_by_session"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let votes_by_participant_db =
            env.create_database(&mut wtxn, Some("votes_by_participant"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            users_db,
            sessions_db,
            rounds_db,
            participants_db,
            participants_by_session_db,
            votes_db,
            votes_by_participant_db,
        })
    }
}
