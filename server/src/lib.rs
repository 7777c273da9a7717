//! HTTP API for the Outlast voting backend.
//!
//! Provides endpoints for:
//! - Signature authentication and session tokens
//! - Vote submission (gated on token ownership, rate limited)
//! - Round status and results
//! - Leaderboard and reward eligibility

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use extract::ApiJson;
pub use server::{router, serve};
pub use state::AppState;
