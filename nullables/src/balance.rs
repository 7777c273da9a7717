//! Nullable balance provider — configurable token balances for testing.

use outlast_chain::{BalanceProvider, ChainError};
use outlast_types::WalletAddress;
use std::collections::HashMap;
use std::sync::Mutex;

/// A balance provider backed by a configurable in-memory table.
///
/// Unknown addresses report a zero balance. Flip `set_failing` to simulate
/// an unreachable RPC endpoint.
pub struct NullBalanceProvider {
    balances: Mutex<HashMap<String, u128>>,
    failing: Mutex<bool>,
}

impl NullBalanceProvider {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            failing: Mutex::new(false),
        }
    }

    /// Configure the balance reported for an address.
    pub fn set_balance(&self, address: &WalletAddress, balance: u128) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.as_str().to_string(), balance);
    }

    /// Make every subsequent call fail as if the RPC endpoint were down.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

impl Default for NullBalanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceProvider for NullBalanceProvider {
    async fn token_balance(&self, address: &WalletAddress) -> Result<u128, ChainError> {
        if *self.failing.lock().unwrap() {
            return Err(ChainError::Upstream("simulated RPC outage".into()));
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(address.as_str())
            .copied()
            .unwrap_or(0))
    }
}
