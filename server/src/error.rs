//! API error taxonomy.
//!
//! Every failure surfaces as a JSON body `{"error": "..."}` with the
//! status that tells the client what to do about it: fix the request
//! (400), re-authenticate (401), acquire the token (403), back off (429
//! with `Retry-After`), or retry later (502). Internal details never
//! reach the wire.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use outlast_chain::ChainError;
use outlast_game::GameError;
use outlast_identity::IdentityError;
use outlast_store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("rate limit exceeded")]
    RateLimited { retry_after_secs: u64 },

    #[error("upstream service unavailable")]
    Upstream,

    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::RateLimited { retry_after_secs } => {
                json!({ "error": self.to_string(), "retry_after_secs": retry_after_secs })
            }
            _ => json!({ "error": self.to_string() }),
        };
        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = retry_after_secs.to_string().parse() {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        match e {
            GameError::Validation(msg) => ApiError::BadRequest(msg),
            GameError::NoActiveSession => ApiError::NotFound("no active game session".into()),
            GameError::NoActiveRound => ApiError::NotFound("no active voting round".into()),
            GameError::RoundNotFound(n) => ApiError::NotFound(format!("round {n} not found")),
            GameError::InvalidParticipant(id) => {
                ApiError::BadRequest(format!("invalid participant: {id}"))
            }
            GameError::DuplicateVote => {
                ApiError::Conflict("already voted for this category in this round".into())
            }
            GameError::RateLimited { retry_after_secs } => {
                ApiError::RateLimited { retry_after_secs }
            }
            GameError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                ApiError::Internal
            }
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Validation(msg) => ApiError::BadRequest(msg),
            IdentityError::InvalidSignature | IdentityError::Unauthorized => {
                ApiError::Unauthorized
            }
            IdentityError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                ApiError::Internal
            }
        }
    }
}

impl From<ChainError> for ApiError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::NotEligible => {
                ApiError::Forbidden("wallet does not hold a qualifying token".into())
            }
            ChainError::Upstream(msg) => {
                tracing::warn!(error = %msg, "chain RPC unavailable");
                ApiError::Upstream
            }
            ChainError::InvalidResponse(msg) => {
                tracing::warn!(error = %msg, "chain RPC returned malformed data");
                ApiError::Upstream
            }
            ChainError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                ApiError::Internal
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(key) => ApiError::NotFound(format!("not found: {key}")),
            other => {
                tracing::error!(error = %other, "store failure");
                ApiError::Internal
            }
        }
    }
}

/// Configuration loading failure, used by the daemon at startup.
#[derive(Debug, Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);
