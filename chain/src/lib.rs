//! On-chain eligibility gate for the Outlast voting game.
//!
//! Voting is gated on holding at least one qualifying token. The balance
//! is read from a JSON-RPC endpoint on every privileged call — balances
//! change, so nothing is cached across requests. A zero balance is a
//! legitimate "not eligible" outcome and gets recorded on the user record;
//! an RPC failure is a distinct, retryable error that leaves the record
//! untouched.

pub mod error;
pub mod gate;
pub mod rpc;

pub use error::ChainError;
pub use gate::EligibilityGate;
pub use rpc::TokenRpcClient;

use outlast_types::WalletAddress;
use std::future::Future;

/// Read-only access to a wallet's token balance.
pub trait BalanceProvider: Send + Sync {
    fn token_balance(
        &self,
        address: &WalletAddress,
    ) -> impl Future<Output = Result<u128, ChainError>> + Send;
}

impl<P: BalanceProvider> BalanceProvider for std::sync::Arc<P> {
    fn token_balance(
        &self,
        address: &WalletAddress,
    ) -> impl Future<Output = Result<u128, ChainError>> + Send {
        (**self).token_balance(address)
    }
}
