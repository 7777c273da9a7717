//! Nullable infrastructure for deterministic testing.
//!
//! Drop-in stand-ins for the real storage backend and chain RPC client.
//! Balances are whatever the test configures, and the store lives in
//! memory. Time never needs a stand-in: every operation takes the current
//! `Timestamp` as an argument, so tests pass whatever instant they want.

pub mod balance;
pub mod store;

pub use balance::NullBalanceProvider;
pub use store::NullStore;
