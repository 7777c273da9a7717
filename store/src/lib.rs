//! Abstract storage traits for the Outlast voting game.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits. The store
//! is the single source of truth: no component caches vote or participant
//! state across calls.

pub mod error;
pub mod participant;
pub mod round;
pub mod session;
pub mod user;
pub mod vote;

pub use error::StoreError;
pub use participant::{Participant, ParticipantStore};
pub use round::{RoundStore, VotingRound};
pub use session::{GameSession, SessionStore};
pub use user::{User, UserStore};
pub use vote::{Vote, VoteStore};

/// Convenience bound for components that need the whole storage surface.
pub trait GameStore:
    UserStore + SessionStore + RoundStore + ParticipantStore + VoteStore + Send + Sync
{
}

impl<T> GameStore for T where
    T: UserStore + SessionStore + RoundStore + ParticipantStore + VoteStore + Send + Sync
{
}
