//! Composite key encoding for the LMDB databases.
//!
//! Keys are built so that lexicographic byte order matches the query order
//! we need: big-endian integers sort numerically, and every composite key
//! starts with the owning session/participant id so prefix iteration yields
//! exactly one collection's rows.
//!
//! A `0x00` separator terminates variable-length id segments. Ids are
//! opaque strings produced by our own setup tooling and never contain NUL.

use outlast_types::{Fid, ParticipantId, SessionId, Timestamp, VoteCategory};

/// users_db key: fid as big-endian u64.
pub fn user_key(fid: Fid) -> [u8; 8] {
    fid.as_u64().to_be_bytes()
}

/// rounds_db key: `session | 0x00 | round_be`.
pub fn round_key(session: &SessionId, number: u64) -> Vec<u8> {
    let mut key = session.as_str().as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(&number.to_be_bytes());
    key
}

/// participants_by_session_db key: `session | 0x00 | participant_id`.
pub fn session_participant_key(session: &SessionId, participant: &ParticipantId) -> Vec<u8> {
    let mut key = session.as_str().as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(participant.as_str().as_bytes());
    key
}

/// votes_db key: `session | 0x00 | round_be | category | fid_be`.
///
/// This key IS the uniqueness constraint: one (voter, session, round,
/// category) tuple maps to exactly one slot.
pub fn vote_key(session: &SessionId, round: u64, category: VoteCategory, voter: Fid) -> Vec<u8> {
    let mut key = session.as_str().as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(&round.to_be_bytes());
    key.push(category.as_byte());
    key.extend_from_slice(&voter.as_u64().to_be_bytes());
    key
}

/// Prefix matching every vote of one round.
pub fn vote_round_prefix(session: &SessionId, round: u64) -> Vec<u8> {
    let mut key = session.as_str().as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(&round.to_be_bytes());
    key
}

/// votes_by_participant_db key: `participant | 0x00 | created_at_be | fid_be`.
///
/// Ordered by creation time so reverse iteration yields newest first.
pub fn participant_vote_key(
    participant: &ParticipantId,
    created_at: Timestamp,
    voter: Fid,
) -> Vec<u8> {
    let mut key = participant.as_str().as_bytes().to_vec();
    key.push(0);
    key.extend_from_slice(&created_at.as_secs().to_be_bytes());
    key.extend_from_slice(&voter.as_u64().to_be_bytes());
    key
}

/// Prefix matching every vote received by one participant.
pub fn participant_vote_prefix(participant: &ParticipantId) -> Vec<u8> {
    let mut key = participant.as_str().as_bytes().to_vec();
    key.push(0);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_keys_sort_numerically() {
        let s = SessionId::new("s1");
        assert!(round_key(&s, 2) < round_key(&s, 10));
    }

    #[test]
    fn vote_key_distinguishes_categories() {
        let s = SessionId::new("s1");
        let fid = Fid::new(7);
        assert_ne!(
            vote_key(&s, 1, VoteCategory::Mvp, fid),
            vote_key(&s, 1, VoteCategory::Eliminate, fid)
        );
    }

    #[test]
    fn vote_keys_share_round_prefix() {
        let s = SessionId::new("s1");
        let key = vote_key(&s, 3, VoteCategory::Eliminate, Fid::new(9));
        assert!(key.starts_with(&vote_round_prefix(&s, 3)));
        assert!(!key.starts_with(&vote_round_prefix(&s, 4)));
    }

    #[test]
    fn session_prefix_does_not_bleed_between_sessions() {
        // "s1" must not prefix-match "s10"'s rows
        let a = vote_round_prefix(&SessionId::new("s1"), 1);
        let key = vote_key(&SessionId::new("s10"), 1, VoteCategory::Mvp, Fid::new(1));
        assert!(!key.starts_with(&a));
    }
}
