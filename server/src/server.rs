//! Router construction and serving.

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use outlast_chain::BalanceProvider;
use outlast_store::GameStore;

use crate::{routes, AppState};

/// Build the full API router over the given state.
pub fn router<S, P>(state: AppState<S, P>) -> Router
where
    S: GameStore + 'static,
    P: BalanceProvider + 'static,
{
    Router::new()
        .route("/api/auth", post(routes::auth))
        .route("/api/auth/verify", post(routes::auth_verify))
        .route("/api/auth/refresh", post(routes::auth_refresh))
        .route("/api/voting/participants", get(routes::voting_participants))
        .route("/api/voting/cast", post(routes::voting_cast))
        .route("/api/voting/status", get(routes::voting_status))
        .route("/api/voting/results", get(routes::voting_results))
        .route("/api/leaderboard", get(routes::leaderboard))
        .route("/api/game/current", get(routes::game_current))
        .route("/api/rewards/eligible", get(routes::rewards_eligible))
        .route("/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve<S, P>(state: AppState<S, P>, port: u16) -> Result<(), std::io::Error>
where
    S: GameStore + 'static,
    P: BalanceProvider + 'static,
{
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "HTTP server listening");
    axum::serve(listener, router(state)).await
}
