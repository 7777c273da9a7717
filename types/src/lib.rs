//! Fundamental types for the Outlast voting game.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identifiers, wallet addresses, vote categories, lifecycle
//! status enums, and timestamps.

pub mod address;
pub mod id;
pub mod state;
pub mod time;

pub use address::WalletAddress;
pub use id::{Fid, ParticipantId, SessionId};
pub use state::{ParticipantStatus, SessionStatus, VoteCategory};
pub use time::Timestamp;
