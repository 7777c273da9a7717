//! Identity error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid signature")]
    InvalidSignature,

    /// Covers expired, malformed, and unknown-user tokens. The distinction
    /// is logged internally but never surfaced to the caller, to avoid
    /// identity probing.
    #[error("unauthorized")]
    Unauthorized,

    #[error("store error: {0}")]
    Store(#[from] outlast_store::StoreError),
}
