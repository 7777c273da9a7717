//! Shared handler state.

use std::ops::Deref;
use std::sync::Arc;

use outlast_chain::{BalanceProvider, EligibilityGate};
use outlast_game::{RateLimiter, VotingEngine};
use outlast_identity::{IdentityService, TokenSigner};
use outlast_store::GameStore;

use crate::ServerConfig;

/// Everything the handlers need, behind one `Arc` so the state clones
/// axum hands out stay cheap.
pub struct AppState<S, P> {
    inner: Arc<AppInner<S, P>>,
}

pub struct AppInner<S, P> {
    pub store: Arc<S>,
    pub identity: IdentityService<S>,
    pub gate: EligibilityGate<S, P>,
    pub engine: VotingEngine<S>,
    pub limiter: RateLimiter,
    pub reward_amount: u64,
}

impl<S, P> Clone for AppState<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S, P> Deref for AppState<S, P> {
    type Target = AppInner<S, P>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<S: GameStore, P: BalanceProvider> AppState<S, P> {
    pub fn new(store: Arc<S>, provider: P, config: &ServerConfig) -> Self {
        let signer = TokenSigner::new(config.token_secret.as_bytes(), config.token_ttl_secs);
        Self {
            inner: Arc::new(AppInner {
                identity: IdentityService::new(store.clone(), signer),
                gate: EligibilityGate::new(store.clone(), provider),
                engine: VotingEngine::new(store.clone()),
                limiter: RateLimiter::new(config.rate_limit_window_secs, config.rate_limit_max),
                reward_amount: config.reward_amount,
                store,
            }),
        }
    }
}
