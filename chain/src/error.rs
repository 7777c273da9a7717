//! Chain error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// The wallet holds no qualifying token. A definitive outcome, not a
    /// failure.
    #[error("token ownership required")]
    NotEligible,

    /// The RPC call itself failed (network, timeout, upstream error).
    /// Retryable by the caller; never treated as "not eligible".
    #[error("chain RPC unavailable: {0}")]
    Upstream(String),

    /// The RPC endpoint answered with something we cannot interpret.
    #[error("malformed RPC response: {0}")]
    InvalidResponse(String),

    #[error("store error: {0}")]
    Store(#[from] outlast_store::StoreError),
}
