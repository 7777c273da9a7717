//! Shared utilities for the Outlast backend.

pub mod cadence;
pub mod logging;

pub use cadence::secs_until_next_boundary;
pub use logging::init_tracing;
