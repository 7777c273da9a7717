//! The identity service: authentication and token verification over a
//! user store.

use outlast_store::user::{User, UserStore};
use outlast_types::{Fid, Timestamp, WalletAddress};
use serde::Deserialize;
use std::sync::Arc;

use crate::signature::verify_challenge;
use crate::token::TokenSigner;
use crate::IdentityError;

/// Maximum accepted username length.
const MAX_USERNAME_LEN: usize = 50;

/// An authentication request as received from a client.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthRequest {
    pub fid: u64,
    pub username: String,
    pub wallet_address: String,
    pub public_key: String,
    pub signature: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

/// Authentication and session verification over a [`UserStore`].
pub struct IdentityService<S> {
    store: Arc<S>,
    signer: TokenSigner,
}

impl<S: UserStore> IdentityService<S> {
    pub fn new(store: Arc<S>, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Authenticate a signed challenge and issue a session token.
    ///
    /// On success the user record is upserted with merge semantics:
    /// `created_at` survives re-authentication, everything else is
    /// refreshed from the request.
    pub fn authenticate(
        &self,
        request: &AuthRequest,
        now: Timestamp,
    ) -> Result<(String, User), IdentityError> {
        if request.username.is_empty() || request.username.len() > MAX_USERNAME_LEN {
            return Err(IdentityError::Validation(format!(
                "username must be 1..={MAX_USERNAME_LEN} characters"
            )));
        }
        let claimed = WalletAddress::new(request.wallet_address.clone());
        if !claimed.is_well_formed() {
            return Err(IdentityError::Validation(
                "wallet_address is not a valid address".into(),
            ));
        }

        let fid = Fid::new(request.fid);
        let address = verify_challenge(
            fid,
            &request.wallet_address,
            &request.public_key,
            &request.signature,
        )?;

        let existing = match self.store.user_exists(fid)? {
            true => Some(self.store.get_user(fid)?),
            false => None,
        };
        let user = User {
            fid,
            wallet_address: address,
            username: request.username.clone(),
            profile_image: request.profile_image.clone().unwrap_or_default(),
            // Eligibility is only ever granted by the gate, never carried
            // over from the wire.
            nft_verified: existing.as_ref().is_some_and(|u| u.nft_verified),
            last_nft_check: existing.as_ref().and_then(|u| u.last_nft_check),
            created_at: existing.as_ref().map_or(now, |u| u.created_at),
            last_active: now,
        };
        self.store.put_user(&user)?;

        let token = self.signer.issue(fid, now);
        tracing::info!(%fid, "authenticated");
        Ok((token, user))
    }

    /// Verify a bearer token and load the referenced user.
    ///
    /// Updates `last_active` as a side effect. Expired/invalid tokens and
    /// missing users all surface as `Unauthorized`.
    pub fn verify_token(&self, token: &str, now: Timestamp) -> Result<User, IdentityError> {
        let fid = self.signer.verify(token, now)?;
        if !self.store.user_exists(fid)? {
            tracing::debug!(%fid, "token valid but user record missing");
            return Err(IdentityError::Unauthorized);
        }
        self.store.touch_last_active(fid, now)?;
        Ok(self.store.get_user(fid)?)
    }

    /// Issue a fresh token for an already-verified identity.
    pub fn refresh_token(&self, fid: Fid, now: Timestamp) -> String {
        self.signer.issue(fid, now)
    }
}
