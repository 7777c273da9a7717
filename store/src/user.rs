//! User storage trait.

use crate::StoreError;
use outlast_types::{Fid, Timestamp, WalletAddress};
use serde::{Deserialize, Serialize};

/// A voting user, created on first successful signature verification.
///
/// `nft_verified` is refreshed by the eligibility gate only, never from
/// client-supplied data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub fid: Fid,
    pub wallet_address: WalletAddress,
    pub username: String,
    pub profile_image: String,
    pub nft_verified: bool,
    pub last_nft_check: Option<Timestamp>,
    pub created_at: Timestamp,
    pub last_active: Timestamp,
}

/// Trait for user storage operations.
pub trait UserStore {
    fn get_user(&self, fid: Fid) -> Result<User, StoreError>;
    fn put_user(&self, user: &User) -> Result<(), StoreError>;
    fn user_exists(&self, fid: Fid) -> Result<bool, StoreError>;

    /// Record activity on a verified token check.
    fn touch_last_active(&self, fid: Fid, now: Timestamp) -> Result<(), StoreError>;

    /// Record the outcome of an eligibility check.
    fn set_nft_verified(&self, fid: Fid, verified: bool, now: Timestamp) -> Result<(), StoreError>;
}
