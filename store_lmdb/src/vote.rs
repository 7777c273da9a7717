//! LMDB implementation of VoteStore.
//!
//! The vote's primary key already encodes the uniqueness tuple, so the
//! duplicate check is a key lookup inside the same write transaction as the
//! insert. LMDB allows one writer at a time, which serializes racing
//! inserts of the same key: the first commit wins, the second sees the key
//! and fails with `Duplicate`.

use outlast_store::vote::{Vote, VoteStore};
use outlast_store::StoreError;
use outlast_types::{Fid, ParticipantId, SessionId, VoteCategory};

use crate::environment::LmdbStore;
use crate::keys::{
    participant_vote_key, participant_vote_prefix, vote_key, vote_round_prefix,
};
use crate::LmdbError;

impl LmdbStore {
    fn try_insert_vote_txn(&self, vote: &Vote) -> Result<(), LmdbError> {
        let key = vote_key(
            &vote.session_id,
            vote.round_number,
            vote.category,
            vote.voter,
        );
        let bytes = bincode::serialize(vote)?;

        let mut wtxn = self.env.write_txn()?;
        if self.votes_db.get(&wtxn, &key)?.is_some() {
            return Err(LmdbError::Duplicate(format!(
                "vote ({}, round {}, {})",
                vote.voter, vote.round_number, vote.category
            )));
        }
        self.votes_db.put(&mut wtxn, &key, &bytes)?;
        self.votes_by_participant_db.put(
            &mut wtxn,
            &participant_vote_key(&vote.participant, vote.created_at, vote.voter),
            &bytes,
        )?;
        wtxn.commit()?;
        Ok(())
    }
}

impl VoteStore for LmdbStore {
    fn try_insert_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        Ok(self.try_insert_vote_txn(vote)?)
    }

    fn votes_for_round(&self, session: &SessionId, round: u64) -> Result<Vec<Vote>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = vote_round_prefix(session, round);
        let iter = self
            .votes_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;

        let mut votes = Vec::new();
        for entry in iter {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            votes.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(votes)
    }

    fn categories_voted(
        &self,
        session: &SessionId,
        round: u64,
        voter: Fid,
    ) -> Result<Vec<VoteCategory>, StoreError> {
        // Point lookups instead of the default round scan.
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut cats = Vec::new();
        for cat in VoteCategory::ALL {
            let key = vote_key(session, round, cat, voter);
            if self
                .votes_db
                .get(&rtxn, &key)
                .map_err(LmdbError::from)?
                .is_some()
            {
                cats.push(cat);
            }
        }
        Ok(cats)
    }

    fn votes_for_participant(
        &self,
        participant: &ParticipantId,
    ) -> Result<Vec<Vote>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = participant_vote_prefix(participant);
        let iter = self
            .votes_by_participant_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;

        let mut votes: Vec<Vote> = Vec::new();
        for entry in iter {
            let (_, bytes) = entry.map_err(LmdbError::from)?;
            votes.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        // Key order is oldest-first; callers want newest first.
        votes.reverse();
        Ok(votes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlast_types::Timestamp;

    fn temp_store() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LmdbStore::open(dir.path(), 16 * 1024 * 1024).expect("open env");
        (dir, store)
    }

    fn make_vote(fid: u64, round: u64, category: VoteCategory) -> Vote {
        Vote {
            voter: Fid::new(fid),
            participant: ParticipantId::new("p-1"),
            category,
            round_number: round,
            session_id: SessionId::new("s-1"),
            created_at: Timestamp::new(1000 + fid),
        }
    }

    #[test]
    fn insert_then_duplicate_rejected() {
        let (_dir, store) = temp_store();
        let vote = make_vote(1, 1, VoteCategory::Mvp);
        store.try_insert_vote(&vote).expect("first insert");

        let err = store.try_insert_vote(&vote).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn same_voter_different_category_allowed() {
        let (_dir, store) = temp_store();
        store
            .try_insert_vote(&make_vote(1, 1, VoteCategory::Mvp))
            .unwrap();
        store
            .try_insert_vote(&make_vote(1, 1, VoteCategory::Eliminate))
            .unwrap();
        assert_eq!(
            store
                .votes_for_round(&SessionId::new("s-1"), 1)
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn same_voter_next_round_allowed() {
        let (_dir, store) = temp_store();
        store
            .try_insert_vote(&make_vote(1, 1, VoteCategory::Mvp))
            .unwrap();
        store
            .try_insert_vote(&make_vote(1, 2, VoteCategory::Mvp))
            .unwrap();
    }

    #[test]
    fn round_scan_excludes_other_rounds() {
        let (_dir, store) = temp_store();
        store
            .try_insert_vote(&make_vote(1, 1, VoteCategory::Mvp))
            .unwrap();
        store
            .try_insert_vote(&make_vote(2, 2, VoteCategory::Mvp))
            .unwrap();

        let round1 = store.votes_for_round(&SessionId::new("s-1"), 1).unwrap();
        assert_eq!(round1.len(), 1);
        assert_eq!(round1[0].voter, Fid::new(1));
    }

    #[test]
    fn categories_voted_reports_used_slots() {
        let (_dir, store) = temp_store();
        let session = SessionId::new("s-1");
        store
            .try_insert_vote(&make_vote(5, 1, VoteCategory::Eliminate))
            .unwrap();

        let cats = store.categories_voted(&session, 1, Fid::new(5)).unwrap();
        assert_eq!(cats, vec![VoteCategory::Eliminate]);
        assert!(store
            .categories_voted(&session, 1, Fid::new(6))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn participant_history_newest_first() {
        let (_dir, store) = temp_store();
        store
            .try_insert_vote(&make_vote(1, 1, VoteCategory::Mvp))
            .unwrap();
        store
            .try_insert_vote(&make_vote(2, 1, VoteCategory::Mvp))
            .unwrap();

        let history = store
            .votes_for_participant(&ParticipantId::new("p-1"))
            .unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].created_at >= history[1].created_at);
    }

    #[test]
    fn concurrent_duplicate_inserts_only_one_wins() {
        use std::sync::Arc;

        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(LmdbStore::open(dir.path(), 16 * 1024 * 1024).expect("open env"));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                store.try_insert_vote(&make_vote(42, 1, VoteCategory::Eliminate))
            }));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(StoreError::Duplicate(_)))));
    }
}
