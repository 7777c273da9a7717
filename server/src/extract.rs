//! Bearer-token authentication and request-body extraction.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, HeaderMap};

use outlast_chain::BalanceProvider;
use outlast_store::user::User;
use outlast_store::GameStore;
use outlast_types::Timestamp;

use crate::{ApiError, AppState};

/// JSON request body that rejects with the API's own 400 error shape
/// instead of axum's default 422 plain-text rejection.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::Unauthorized)?
        .to_str()
        .map_err(|_| ApiError::Unauthorized)?;
    value
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)
}

/// Resolve the request's bearer token to a user record.
pub fn require_user<S: GameStore, P: BalanceProvider>(
    state: &AppState<S, P>,
    headers: &HeaderMap,
    now: Timestamp,
) -> Result<User, ApiError> {
    let token = bearer_token(headers)?;
    Ok(state.identity.verify_token(token, now)?)
}
