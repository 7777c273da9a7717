//! Identifier newtypes.
//!
//! `Fid` is the numeric identity of a voting user (the Farcaster id in the
//! original deployment). Sessions and participants are identified by opaque
//! strings assigned at setup time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a voting user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fid(u64);

impl Fid {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a game session (one full run of the elimination game).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a competitor in the game.
///
/// Participants are distinct from voting users: a user may or may not also
/// be a participant. The ordering derived here is the deterministic
/// tie-break used when vote counts are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fid_roundtrip() {
        let fid = Fid::new(42);
        assert_eq!(fid.as_u64(), 42);
        assert_eq!(fid.to_string(), "42");
    }

    #[test]
    fn participant_ids_order_lexicographically() {
        let a = ParticipantId::new("p-01");
        let b = ParticipantId::new("p-02");
        assert!(a < b);
    }
}
