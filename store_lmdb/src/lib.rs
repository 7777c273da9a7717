//! LMDB storage backend for the Outlast voting game.
//!
//! Implements all storage traits from `outlast-store` using the `heed` LMDB
//! bindings. Each logical collection maps to one LMDB database within a
//! single environment. LMDB's single-writer lock is what makes the
//! check-then-insert in [`keys`]-based vote storage atomic: two racing
//! inserts of the same vote key are serialized, so exactly one wins.

pub mod environment;
pub mod error;
pub mod keys;
mod participant;
mod round;
mod session;
mod user;
mod vote;

pub use environment::LmdbStore;
pub use error::LmdbError;
