//! Core game logic for Outlast: the voting round state machine, the
//! elimination scheduler, and the vote rate limiter.
//!
//! Everything here operates on the storage traits from `outlast-store`;
//! the document store is the single source of truth and no vote or
//! participant state is cached across calls.

pub mod error;
pub mod limiter;
pub mod scheduler;
pub mod voting;

pub use error::GameError;
pub use limiter::RateLimiter;
pub use scheduler::{EliminationScheduler, TickOutcome};
pub use voting::{RoundResults, VotingEngine, VotingStatus};

/// Default round length and scheduler cadence: 12 hours.
pub const DEFAULT_ROUND_DURATION_SECS: u64 = 12 * 60 * 60;
