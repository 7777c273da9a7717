//! The eligibility gate: balance check + verified-flag bookkeeping.

use outlast_store::user::{User, UserStore};
use outlast_types::Timestamp;
use std::sync::Arc;

use crate::{BalanceProvider, ChainError};

/// Gates privileged actions on token ownership.
///
/// Checked on every privileged call; the result is recorded on the user
/// record but never trusted across requests.
pub struct EligibilityGate<S, P> {
    store: Arc<S>,
    provider: P,
}

impl<S: UserStore, P: BalanceProvider> EligibilityGate<S, P> {
    pub fn new(store: Arc<S>, provider: P) -> Self {
        Self { store, provider }
    }

    /// Require that `user` holds at least one qualifying token.
    ///
    /// A zero balance records `nft_verified = false` and fails with
    /// `NotEligible`. An RPC failure propagates as `Upstream` without
    /// touching the record.
    pub async fn require_eligible(&self, user: &User, now: Timestamp) -> Result<(), ChainError> {
        let balance = self.provider.token_balance(&user.wallet_address).await?;
        if balance == 0 {
            self.store.set_nft_verified(user.fid, false, now)?;
            tracing::debug!(fid = %user.fid, "eligibility check failed: zero balance");
            return Err(ChainError::NotEligible);
        }
        self.store.set_nft_verified(user.fid, true, now)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outlast_store::StoreError;
    use outlast_types::{Fid, WalletAddress};
    use std::sync::Mutex;

    struct FixedBalance(Result<u128, ()>);

    impl BalanceProvider for FixedBalance {
        async fn token_balance(&self, _: &WalletAddress) -> Result<u128, ChainError> {
            self.0.map_err(|_| ChainError::Upstream("down".into()))
        }
    }

    /// Records `set_nft_verified` calls; everything else is unsupported.
    #[derive(Default)]
    struct RecordingStore {
        verified: Mutex<Vec<(Fid, bool)>>,
    }

    impl UserStore for RecordingStore {
        fn get_user(&self, fid: Fid) -> Result<User, StoreError> {
            Err(StoreError::NotFound(fid.to_string()))
        }

        fn put_user(&self, _: &User) -> Result<(), StoreError> {
            Ok(())
        }

        fn user_exists(&self, _: Fid) -> Result<bool, StoreError> {
            Ok(false)
        }

        fn touch_last_active(&self, _: Fid, _: Timestamp) -> Result<(), StoreError> {
            Ok(())
        }

        fn set_nft_verified(
            &self,
            fid: Fid,
            verified: bool,
            _: Timestamp,
        ) -> Result<(), StoreError> {
            self.verified.lock().unwrap().push((fid, verified));
            Ok(())
        }
    }

    fn user() -> User {
        User {
            fid: Fid::new(7),
            wallet_address: WalletAddress::new(format!("out_{}", "a".repeat(64))),
            username: "voter".into(),
            profile_image: String::new(),
            nft_verified: false,
            last_nft_check: None,
            created_at: Timestamp::new(0),
            last_active: Timestamp::new(0),
        }
    }

    #[tokio::test]
    async fn nonzero_balance_passes_and_records_verified() {
        let store = Arc::new(RecordingStore::default());
        let gate = EligibilityGate::new(store.clone(), FixedBalance(Ok(3)));
        gate.require_eligible(&user(), Timestamp::new(10)).await.unwrap();
        assert_eq!(*store.verified.lock().unwrap(), vec![(Fid::new(7), true)]);
    }

    #[tokio::test]
    async fn zero_balance_is_not_eligible_and_records_it() {
        let store = Arc::new(RecordingStore::default());
        let gate = EligibilityGate::new(store.clone(), FixedBalance(Ok(0)));
        let err = gate
            .require_eligible(&user(), Timestamp::new(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::NotEligible));
        assert_eq!(*store.verified.lock().unwrap(), vec![(Fid::new(7), false)]);
    }

    #[tokio::test]
    async fn rpc_failure_propagates_without_touching_the_record() {
        let store = Arc::new(RecordingStore::default());
        let gate = EligibilityGate::new(store.clone(), FixedBalance(Err(())));
        let err = gate
            .require_eligible(&user(), Timestamp::new(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ChainError::Upstream(_)));
        assert!(store.verified.lock().unwrap().is_empty());
    }
}
