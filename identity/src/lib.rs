//! Identity and session handling for the Outlast backend.
//!
//! Two concerns live here:
//!
//! - **Challenge signatures**: a client proves control of a wallet by
//!   signing a fixed challenge string containing its numeric id. The
//!   signing address is recomputed from the public key and must match the
//!   claimed wallet address case-insensitively.
//! - **Session tokens**: HMAC-signed bearer tokens bound to the numeric id
//!   with a fixed expiry (7 days by default).

pub mod error;
pub mod service;
pub mod signature;
pub mod token;

pub use error::IdentityError;
pub use service::{AuthRequest, IdentityService};
pub use signature::{challenge_message, derive_address, verify_challenge};
pub use token::TokenSigner;

/// Default session token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;
