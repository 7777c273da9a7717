//! The voting round state machine.
//!
//! Sessions move through
//! `{no active session} -> {active, no round} -> {active, round open}`,
//! cycling back to an open round after each elimination, until a terminal
//! condition completes the session. This module is the read/write surface
//! the HTTP handlers use; the scheduler in [`crate::scheduler`] drives the
//! transitions between rounds.

use outlast_store::participant::Participant;
use outlast_store::round::VotingRound;
use outlast_store::session::GameSession;
use outlast_store::vote::Vote;
use outlast_store::{GameStore, StoreError};
use outlast_types::{Fid, ParticipantId, SessionId, Timestamp, VoteCategory};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::GameError;

/// Vote counts per participant for one category. Keyed by participant id,
/// so iteration order doubles as the deterministic tie-break order.
pub type Tally = BTreeMap<ParticipantId, u64>;

/// Aggregate results of one round, computed on read so they always match
/// the underlying vote set.
#[derive(Clone, Debug, Serialize)]
pub struct RoundResults {
    pub round_number: u64,
    pub mvp_tallies: Tally,
    pub eliminate_tallies: Tally,
    pub eliminated_participant: Option<ParticipantId>,
    pub mvp_participant: Option<ParticipantId>,
    pub total_votes: usize,
}

/// What a voter has already done in the current round.
#[derive(Clone, Debug, Serialize)]
pub struct VotingStatus {
    pub has_active_round: bool,
    pub round_number: Option<u64>,
    pub voted_mvp: bool,
    pub voted_eliminate: bool,
    pub can_vote: bool,
}

/// Count votes of one category, grouped by participant.
pub fn tally_votes(votes: &[Vote], category: VoteCategory) -> Tally {
    let mut tally = Tally::new();
    for vote in votes.iter().filter(|v| v.category == category) {
        *tally.entry(vote.participant.clone()).or_insert(0) += 1;
    }
    tally
}

/// Pick the participant with the strict maximum count.
///
/// Ties break to the lowest participant id: the tally map iterates in id
/// order and only a strictly greater count displaces the current winner,
/// so repeated runs over the same data always select the same participant.
pub fn select_winner(tally: &Tally) -> Option<ParticipantId> {
    let mut winner: Option<(&ParticipantId, u64)> = None;
    for (id, &count) in tally {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((id, count)),
        }
    }
    winner.map(|(id, _)| id.clone())
}

/// The HTTP-facing view of the game: reads and vote submission.
pub struct VotingEngine<S> {
    store: Arc<S>,
}

impl<S: GameStore> VotingEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The session currently marked active.
    pub fn active_session(&self) -> Result<GameSession, GameError> {
        self.store
            .active_session()?
            .ok_or(GameError::NoActiveSession)
    }

    /// The round whose `[start, end)` window contains `now`, if any.
    pub fn current_round(
        &self,
        session: &GameSession,
        now: Timestamp,
    ) -> Result<Option<VotingRound>, GameError> {
        if session.current_round == 0 {
            return Ok(None);
        }
        match self.store.get_round(&session.id, session.current_round) {
            Ok(round) if round.is_open(now) => Ok(Some(round)),
            Ok(_) => Ok(None),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Active participants of a session, ordered by id.
    pub fn participants(&self, session: &SessionId) -> Result<Vec<Participant>, GameError> {
        Ok(self.store.active_participants(session)?)
    }

    /// Cast a vote in the current round.
    ///
    /// Preconditions: an active session with an open round, a target
    /// participant that exists and is still active. The one-vote-per-
    /// (voter, round, category) rule is enforced by the store's atomic
    /// insert; a duplicate surfaces as [`GameError::DuplicateVote`] no
    /// matter how the submissions race.
    pub fn cast_vote(
        &self,
        voter: Fid,
        participant_id: &ParticipantId,
        category: VoteCategory,
        now: Timestamp,
    ) -> Result<Vote, GameError> {
        let session = self.active_session()?;
        let round = self
            .current_round(&session, now)?
            .ok_or(GameError::NoActiveRound)?;

        let participant = self
            .store
            .get_participant(participant_id)
            .map_err(|e| match e {
                StoreError::NotFound(_) => {
                    GameError::InvalidParticipant(participant_id.to_string())
                }
                other => other.into(),
            })?;
        if participant.session_id != session.id || !participant.is_active() {
            return Err(GameError::InvalidParticipant(participant_id.to_string()));
        }

        let vote = Vote {
            voter,
            participant: participant_id.clone(),
            category,
            round_number: round.round_number,
            session_id: session.id.clone(),
            created_at: now,
        };
        self.store.try_insert_vote(&vote)?;

        tracing::info!(
            %voter,
            participant = %participant_id,
            %category,
            round = round.round_number,
            "vote cast"
        );
        Ok(vote)
    }

    /// Aggregate results of a round, computed from the vote set at read
    /// time.
    pub fn results(
        &self,
        session: &GameSession,
        round_number: u64,
    ) -> Result<RoundResults, GameError> {
        let round = self
            .store
            .get_round(&session.id, round_number)
            .map_err(|e| match e {
                StoreError::NotFound(_) => GameError::RoundNotFound(round_number),
                other => other.into(),
            })?;
        let votes = self.store.votes_for_round(&session.id, round_number)?;

        Ok(RoundResults {
            round_number,
            mvp_tallies: tally_votes(&votes, VoteCategory::Mvp),
            eliminate_tallies: tally_votes(&votes, VoteCategory::Eliminate),
            eliminated_participant: round.eliminated_participant,
            mvp_participant: round.mvp_participant,
            total_votes: votes.len(),
        })
    }

    /// Which ballot options a voter has already used in the current round.
    pub fn voting_status(&self, voter: Fid, now: Timestamp) -> Result<VotingStatus, GameError> {
        let session = self.active_session()?;
        let Some(round) = self.current_round(&session, now)? else {
            return Ok(VotingStatus {
                has_active_round: false,
                round_number: None,
                voted_mvp: false,
                voted_eliminate: false,
                can_vote: false,
            });
        };

        let cats = self
            .store
            .categories_voted(&session.id, round.round_number, voter)?;
        let voted_mvp = cats.contains(&VoteCategory::Mvp);
        let voted_eliminate = cats.contains(&VoteCategory::Eliminate);
        Ok(VotingStatus {
            has_active_round: true,
            round_number: Some(round.round_number),
            voted_mvp,
            voted_eliminate,
            can_vote: !(voted_mvp && voted_eliminate),
        })
    }

    /// Participants ordered by MVP count descending, then id ascending.
    pub fn leaderboard(&self, session: &SessionId) -> Result<Vec<Participant>, GameError> {
        let mut participants = self.store.participants_in(session)?;
        participants.sort_by(|a, b| b.mvp_count.cmp(&a.mvp_count).then(a.id.cmp(&b.id)));
        Ok(participants)
    }

    /// Whether a voter used both ballot categories in the previous round,
    /// which qualifies them for the participation reward.
    pub fn reward_eligible(&self, voter: Fid, session: &GameSession) -> Result<bool, GameError> {
        if session.current_round <= 1 {
            return Ok(false);
        }
        let cats = self
            .store
            .categories_voted(&session.id, session.current_round - 1, voter)?;
        Ok(cats.len() == VoteCategory::ALL.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> ParticipantId {
        ParticipantId::new(s)
    }

    fn vote(participant: &str, category: VoteCategory, fid: u64) -> Vote {
        Vote {
            voter: Fid::new(fid),
            participant: pid(participant),
            category,
            round_number: 1,
            session_id: SessionId::new("s1"),
            created_at: Timestamp::new(0),
        }
    }

    #[test]
    fn tally_groups_by_participant_and_category() {
        let votes = vec![
            vote("p1", VoteCategory::Eliminate, 1),
            vote("p1", VoteCategory::Eliminate, 2),
            vote("p2", VoteCategory::Eliminate, 3),
            vote("p1", VoteCategory::Mvp, 4),
        ];
        let eliminate = tally_votes(&votes, VoteCategory::Eliminate);
        assert_eq!(eliminate.get(&pid("p1")), Some(&2));
        assert_eq!(eliminate.get(&pid("p2")), Some(&1));

        let mvp = tally_votes(&votes, VoteCategory::Mvp);
        assert_eq!(mvp.get(&pid("p1")), Some(&1));
        assert_eq!(mvp.get(&pid("p2")), None);
    }

    #[test]
    fn winner_is_strict_maximum() {
        let mut tally = Tally::new();
        tally.insert(pid("p1"), 3);
        tally.insert(pid("p2"), 5);
        assert_eq!(select_winner(&tally), Some(pid("p2")));
    }

    #[test]
    fn tie_breaks_to_lowest_id() {
        let mut tally = Tally::new();
        tally.insert(pid("p2"), 4);
        tally.insert(pid("p1"), 4);
        tally.insert(pid("p3"), 4);
        assert_eq!(select_winner(&tally), Some(pid("p1")));
    }

    #[test]
    fn empty_tally_selects_no_one() {
        assert_eq!(select_winner(&Tally::new()), None);
    }

    proptest::proptest! {
        #[test]
        fn winner_holds_the_maximum_count(counts in proptest::collection::vec(1u64..20, 1..8)) {
            let tally: Tally = counts
                .iter()
                .enumerate()
                .map(|(i, &c)| (pid(&format!("p{i}")), c))
                .collect();
            let winner = select_winner(&tally).unwrap();
            proptest::prop_assert_eq!(tally[&winner], *counts.iter().max().unwrap());
        }

        #[test]
        fn winner_is_lowest_id_among_maxima(counts in proptest::collection::vec(1u64..5, 1..8)) {
            let tally: Tally = counts
                .iter()
                .enumerate()
                .map(|(i, &c)| (pid(&format!("p{i}")), c))
                .collect();
            let winner = select_winner(&tally).unwrap();
            let max = *counts.iter().max().unwrap();
            let lowest = tally
                .iter()
                .find(|(_, &c)| c == max)
                .map(|(id, _)| id.clone())
                .unwrap();
            proptest::prop_assert_eq!(winner, lowest);
        }
    }
}
