//! Round lifecycle driver.
//!
//! A single scheduler task wakes on each cadence boundary (00:00 and 12:00
//! UTC at the default 12h cadence), resolves the round whose window just
//! elapsed, applies the elimination and MVP outcome in one store
//! transaction, and opens the next round. Every step is written to be
//! idempotent: a tick that re-runs after a crash, or runs twice, observes
//! the work already done and skips it.

use std::sync::Arc;
use std::time::Duration;

use outlast_store::round::VotingRound;
use outlast_store::session::GameSession;
use outlast_store::{GameStore, StoreError};
use outlast_types::{SessionStatus, Timestamp, VoteCategory};
use outlast_utils::cadence::secs_until_next_boundary;

use crate::voting::{select_winner, tally_votes};
use crate::GameError;

/// What a single tick did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do: no session, or the current round is still open.
    Idle,
    /// A round was opened without resolving a predecessor.
    RoundOpened(u64),
    /// A closed round was resolved; `opened` is the successor round, or
    /// `None` when the session completed instead.
    RoundResolved { resolved: u64, opened: Option<u64> },
    /// The session reached its terminal state.
    SessionCompleted,
}

pub struct EliminationScheduler<S> {
    store: Arc<S>,
    round_duration_secs: u64,
    cadence_secs: u64,
}

impl<S: GameStore> EliminationScheduler<S> {
    pub fn new(store: Arc<S>, round_duration_secs: u64, cadence_secs: u64) -> Self {
        assert!(round_duration_secs > 0 && cadence_secs > 0);
        Self {
            store,
            round_duration_secs,
            cadence_secs,
        }
    }

    /// Run forever, ticking once shortly after every cadence boundary.
    /// Tick failures are logged and never terminate the loop.
    pub async fn run(self) {
        loop {
            let wait = secs_until_next_boundary(Timestamp::now(), self.cadence_secs);
            tokio::time::sleep(Duration::from_secs(wait)).await;

            match self.tick(Timestamp::now()) {
                Ok(TickOutcome::Idle) => {}
                Ok(outcome) => tracing::info!(?outcome, "scheduler tick"),
                Err(e) => tracing::error!(error = %e, "scheduler tick failed"),
            }
        }
    }

    /// Advance the game by at most one step.
    pub fn tick(&self, now: Timestamp) -> Result<TickOutcome, GameError> {
        let Some(session) = self.store.active_session()? else {
            return Ok(TickOutcome::Idle);
        };

        if session.current_round == 0 {
            let round = self.open_round(&session, 1, now)?;
            return Ok(TickOutcome::RoundOpened(round.round_number));
        }

        let round = match self.store.get_round(&session.id, session.current_round) {
            Ok(round) => round,
            // Stale pointer, e.g. a crash between put_round and
            // set_current_round on a previous tick. Re-open it.
            Err(StoreError::NotFound(_)) => {
                let round = self.open_round(&session, session.current_round, now)?;
                return Ok(TickOutcome::RoundOpened(round.round_number));
            }
            Err(e) => return Err(e.into()),
        };

        if round.is_open(now) {
            return Ok(TickOutcome::Idle);
        }

        if !round.is_resolved() {
            self.resolve(&session, &round, now)?;
        }

        if self.store.active_participants(&session.id)?.len() <= 1 {
            self.store
                .set_session_status(&session.id, SessionStatus::Completed)?;
            tracing::info!(session = %session.id, "session completed");
            return Ok(TickOutcome::RoundResolved {
                resolved: round.round_number,
                opened: None,
            });
        }

        let next = round.round_number + 1;
        if !self.store.round_exists(&session.id, next)? {
            self.open_round(&session, next, now)?;
        } else if session.current_round < next {
            self.store.set_current_round(&session.id, next)?;
        }
        Ok(TickOutcome::RoundResolved {
            resolved: round.round_number,
            opened: Some(next),
        })
    }

    /// Tally the round's votes, pick the elimination target and the MVP,
    /// and apply both through the store's atomic resolve.
    fn resolve(
        &self,
        session: &GameSession,
        round: &VotingRound,
        now: Timestamp,
    ) -> Result<(), GameError> {
        let votes = self
            .store
            .votes_for_round(&session.id, round.round_number)?;
        let eliminated = select_winner(&tally_votes(&votes, VoteCategory::Eliminate));
        let mvp = select_winner(&tally_votes(&votes, VoteCategory::Mvp));

        self.store.resolve_round(
            &session.id,
            round.round_number,
            eliminated.as_ref(),
            mvp.as_ref(),
            now,
        )?;
        tracing::info!(
            session = %session.id,
            round = round.round_number,
            eliminated = ?eliminated,
            mvp = ?mvp,
            votes = votes.len(),
            "round resolved"
        );
        Ok(())
    }

    /// Open a round whose window starts at the cadence boundary at or
    /// before `now`, and point the session at it.
    fn open_round(
        &self,
        session: &GameSession,
        number: u64,
        now: Timestamp,
    ) -> Result<VotingRound, GameError> {
        let start = Timestamp::new(now.as_secs() - now.as_secs() % self.cadence_secs);
        let round = VotingRound {
            session_id: session.id.clone(),
            round_number: number,
            start_time: start,
            end_time: start.plus(self.round_duration_secs),
            eliminated_participant: None,
            mvp_participant: None,
        };
        if !self.store.round_exists(&session.id, number)? {
            self.store.put_round(&round)?;
        }
        self.store.set_current_round(&session.id, number)?;
        tracing::info!(session = %session.id, round = number, "round opened");
        Ok(round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlast_nullables::NullStore;
    use outlast_store::participant::Participant;
    use outlast_store::vote::Vote;
    use outlast_store::{ParticipantStore, RoundStore, SessionStore, VoteStore};
    use outlast_types::{Fid, ParticipantId, ParticipantStatus, SessionId};

    const HOUR: u64 = 60 * 60;
    const CADENCE: u64 = 12 * HOUR;

    fn store_with_session(participants: &[&str]) -> Arc<NullStore> {
        let store = Arc::new(NullStore::new());
        store
            .put_session(&GameSession {
                id: SessionId::new("s1"),
                status: SessionStatus::Active,
                current_round: 0,
                created_at: Timestamp::new(0),
            })
            .unwrap();
        for id in participants.iter().copied() {
            store
                .put_participant(&Participant {
                    id: ParticipantId::new(id),
                    session_id: SessionId::new("s1"),
                    user_fid: Fid::new(0),
                    display_name: id.to_string(),
                    status: ParticipantStatus::Active,
                    eliminated_at: None,
                    mvp_count: 0,
                })
                .unwrap();
        }
        store
    }

    fn scheduler(store: Arc<NullStore>) -> EliminationScheduler<NullStore> {
        EliminationScheduler::new(store, CADENCE, CADENCE)
    }

    fn cast(store: &NullStore, fid: u64, participant: &str, category: VoteCategory, at: u64) {
        store
            .try_insert_vote(&Vote {
                voter: Fid::new(fid),
                participant: ParticipantId::new(participant),
                category,
                round_number: 1,
                session_id: SessionId::new("s1"),
                created_at: Timestamp::new(at),
            })
            .unwrap();
    }

    #[test]
    fn no_session_is_idle() {
        let store = Arc::new(NullStore::new());
        let sched = scheduler(store);
        assert_eq!(sched.tick(Timestamp::new(100)).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn bootstrap_opens_round_one_on_the_boundary() {
        let store = store_with_session(&["p1", "p2", "p3"]);
        let sched = scheduler(store.clone());

        let outcome = sched.tick(Timestamp::new(CADENCE + 17)).unwrap();
        assert_eq!(outcome, TickOutcome::RoundOpened(1));

        let round = store.get_round(&SessionId::new("s1"), 1).unwrap();
        assert_eq!(round.start_time, Timestamp::new(CADENCE));
        assert_eq!(round.end_time, Timestamp::new(2 * CADENCE));
        let session = store.get_session(&SessionId::new("s1")).unwrap();
        assert_eq!(session.current_round, 1);
    }

    #[test]
    fn open_round_ticks_are_idle() {
        let store = store_with_session(&["p1", "p2"]);
        let sched = scheduler(store);
        sched.tick(Timestamp::new(0)).unwrap();
        assert_eq!(
            sched.tick(Timestamp::new(HOUR)).unwrap(),
            TickOutcome::Idle
        );
    }

    #[test]
    fn resolution_eliminates_the_vote_leader_and_opens_the_next_round() {
        let store = store_with_session(&["p1", "p2", "p3"]);
        let sched = scheduler(store.clone());
        sched.tick(Timestamp::new(0)).unwrap();

        cast(&store, 1, "p2", VoteCategory::Eliminate, 100);
        cast(&store, 2, "p2", VoteCategory::Eliminate, 200);
        cast(&store, 3, "p1", VoteCategory::Eliminate, 300);
        cast(&store, 1, "p3", VoteCategory::Mvp, 400);

        let outcome = sched.tick(Timestamp::new(CADENCE)).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::RoundResolved {
                resolved: 1,
                opened: Some(2),
            }
        );

        let p2 = store.get_participant(&ParticipantId::new("p2")).unwrap();
        assert_eq!(p2.status, ParticipantStatus::Eliminated);
        assert_eq!(p2.eliminated_at, Some(Timestamp::new(CADENCE)));
        let p3 = store.get_participant(&ParticipantId::new("p3")).unwrap();
        assert_eq!(p3.mvp_count, 1);

        let round1 = store.get_round(&SessionId::new("s1"), 1).unwrap();
        assert_eq!(round1.eliminated_participant, Some(ParticipantId::new("p2")));
        assert_eq!(round1.mvp_participant, Some(ParticipantId::new("p3")));

        let session = store.get_session(&SessionId::new("s1")).unwrap();
        assert_eq!(session.current_round, 2);
        assert!(store.get_round(&SessionId::new("s1"), 2).unwrap().is_open(Timestamp::new(CADENCE)));
    }

    #[test]
    fn ties_eliminate_the_lowest_participant_id() {
        let store = store_with_session(&["p1", "p2", "p3"]);
        let sched = scheduler(store.clone());
        sched.tick(Timestamp::new(0)).unwrap();

        cast(&store, 1, "p3", VoteCategory::Eliminate, 100);
        cast(&store, 2, "p1", VoteCategory::Eliminate, 200);

        sched.tick(Timestamp::new(CADENCE)).unwrap();
        let p1 = store.get_participant(&ParticipantId::new("p1")).unwrap();
        assert_eq!(p1.status, ParticipantStatus::Eliminated);
        let p3 = store.get_participant(&ParticipantId::new("p3")).unwrap();
        assert_eq!(p3.status, ParticipantStatus::Active);
    }

    #[test]
    fn zero_vote_rounds_close_without_elimination() {
        let store = store_with_session(&["p1", "p2"]);
        let sched = scheduler(store.clone());
        sched.tick(Timestamp::new(0)).unwrap();

        let outcome = sched.tick(Timestamp::new(CADENCE)).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::RoundResolved {
                resolved: 1,
                opened: Some(2),
            }
        );
        let round1 = store.get_round(&SessionId::new("s1"), 1).unwrap();
        assert_eq!(round1.eliminated_participant, None);
        assert_eq!(store.active_participants(&SessionId::new("s1")).unwrap().len(), 2);
    }

    #[test]
    fn repeated_ticks_after_the_boundary_are_stable() {
        let store = store_with_session(&["p1", "p2", "p3"]);
        let sched = scheduler(store.clone());
        sched.tick(Timestamp::new(0)).unwrap();
        cast(&store, 1, "p1", VoteCategory::Eliminate, 100);

        sched.tick(Timestamp::new(CADENCE)).unwrap();
        // Same boundary crossed again: round 2 is now open, nothing moves.
        assert_eq!(
            sched.tick(Timestamp::new(CADENCE + 5)).unwrap(),
            TickOutcome::Idle
        );
        let p1 = store.get_participant(&ParticipantId::new("p1")).unwrap();
        assert_eq!(p1.eliminated_at, Some(Timestamp::new(CADENCE)));
        let session = store.get_session(&SessionId::new("s1")).unwrap();
        assert_eq!(session.current_round, 2);
    }

    #[test]
    fn one_survivor_completes_the_session() {
        let store = store_with_session(&["p1", "p2"]);
        let sched = scheduler(store.clone());
        sched.tick(Timestamp::new(0)).unwrap();
        cast(&store, 1, "p2", VoteCategory::Eliminate, 100);

        let outcome = sched.tick(Timestamp::new(CADENCE)).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::RoundResolved {
                resolved: 1,
                opened: None,
            }
        );
        let session = store.get_session(&SessionId::new("s1")).unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        // A completed session produces no further rounds.
        assert_eq!(sched.tick(Timestamp::new(2 * CADENCE)).unwrap(), TickOutcome::Idle);
    }
}
