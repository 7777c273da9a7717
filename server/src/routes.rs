//! HTTP request handlers.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use outlast_chain::BalanceProvider;
use outlast_game::{GameError, RoundResults, VotingStatus};
use outlast_identity::AuthRequest;
use outlast_store::participant::Participant;
use outlast_store::round::VotingRound;
use outlast_store::session::GameSession;
use outlast_store::user::User;
use outlast_store::vote::Vote;
use outlast_store::GameStore;
use outlast_types::{ParticipantId, Timestamp, VoteCategory};

use crate::extract::{require_user, ApiJson};
use crate::{ApiError, AppState};

// ── Auth ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

pub async fn auth<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    ApiJson(request): ApiJson<AuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (token, user) = state.identity.authenticate(&request, Timestamp::now())?;
    Ok(Json(AuthResponse { token, user }))
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: User,
}

pub async fn auth_verify<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, ApiError> {
    let user = require_user(&state, &headers, Timestamp::now())?;
    Ok(Json(VerifyResponse { valid: true, user }))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

pub async fn auth_refresh<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>, ApiError> {
    let now = Timestamp::now();
    let user = require_user(&state, &headers, now)?;
    let token = state.identity.refresh_token(user.fid, now);
    Ok(Json(RefreshResponse { token }))
}

// ── Voting ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ParticipantsResponse {
    pub session_id: String,
    pub round_number: Option<u64>,
    pub participants: Vec<Participant>,
}

pub async fn voting_participants<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    headers: HeaderMap,
) -> Result<Json<ParticipantsResponse>, ApiError> {
    let now = Timestamp::now();
    require_user(&state, &headers, now)?;

    let session = state.engine.active_session()?;
    let round = state.engine.current_round(&session, now)?;
    let participants = state.engine.participants(&session.id)?;
    Ok(Json(ParticipantsResponse {
        session_id: session.id.to_string(),
        round_number: round.map(|r| r.round_number),
        participants,
    }))
}

#[derive(Deserialize)]
pub struct CastRequest {
    pub participant_id: String,
    pub category: VoteCategory,
}

#[derive(Debug, Serialize)]
pub struct CastResponse {
    pub vote: Vote,
}

pub async fn voting_cast<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<CastRequest>,
) -> Result<Json<CastResponse>, ApiError> {
    let now = Timestamp::now();
    let user = require_user(&state, &headers, now)?;

    // Limiter first: a throttled wallet costs neither an RPC call nor a
    // store write.
    state
        .limiter
        .check(user.wallet_address.as_str(), now)
        .map_err(|retry_after_secs| ApiError::RateLimited { retry_after_secs })?;

    state.gate.require_eligible(&user, now).await?;

    let participant = ParticipantId::new(request.participant_id);
    let vote = state
        .engine
        .cast_vote(user.fid, &participant, request.category, now)?;
    Ok(Json(CastResponse { vote }))
}

pub async fn voting_status<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    headers: HeaderMap,
) -> Result<Json<VotingStatus>, ApiError> {
    let now = Timestamp::now();
    let user = require_user(&state, &headers, now)?;
    Ok(Json(state.engine.voting_status(user.fid, now)?))
}

#[derive(Deserialize)]
pub struct ResultsQuery {
    pub round: Option<u64>,
}

pub async fn voting_results<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<RoundResults>, ApiError> {
    let session = state.engine.active_session()?;
    let round = match query.round {
        Some(n) if n > 0 => n,
        Some(n) => return Err(GameError::RoundNotFound(n).into()),
        None if session.current_round > 0 => session.current_round,
        None => return Err(GameError::NoActiveRound.into()),
    };
    Ok(Json(state.engine.results(&session, round)?))
}

// ── Game ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub participants: Vec<Participant>,
}

pub async fn leaderboard<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let session = state.engine.active_session()?;
    let participants = state.engine.leaderboard(&session.id)?;
    Ok(Json(LeaderboardResponse { participants }))
}

#[derive(Debug, Serialize)]
pub struct GameCurrentResponse {
    pub session: GameSession,
    pub round: Option<VotingRound>,
    pub active_participants: usize,
}

pub async fn game_current<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
) -> Result<Json<GameCurrentResponse>, ApiError> {
    let now = Timestamp::now();
    let session = state.engine.active_session()?;
    let round = state.engine.current_round(&session, now)?;
    let active = state.store.active_participants(&session.id)?.len();
    Ok(Json(GameCurrentResponse {
        session,
        round,
        active_participants: active,
    }))
}

#[derive(Debug, Serialize)]
pub struct RewardsResponse {
    pub eligible: bool,
    pub amount: u64,
}

pub async fn rewards_eligible<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
    headers: HeaderMap,
) -> Result<Json<RewardsResponse>, ApiError> {
    let now = Timestamp::now();
    let user = require_user(&state, &headers, now)?;
    state.gate.require_eligible(&user, now).await?;

    let session = state.engine.active_session()?;
    let eligible = state.engine.reward_eligible(user.fid, &session)?;
    Ok(Json(RewardsResponse {
        eligible,
        amount: if eligible { state.reward_amount } else { 0 },
    }))
}

// ── Health ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health<S: GameStore, P: BalanceProvider>(
    State(state): State<AppState<S, P>>,
) -> Result<Json<HealthResponse>, ApiError> {
    // Touch the store so a wedged backend reports unhealthy.
    match state.store.active_session() {
        Ok(_) => Ok(Json(HealthResponse { status: "ok" })),
        Err(e) => Err(ApiError::from(e)),
    }
}
