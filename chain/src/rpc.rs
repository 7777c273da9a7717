//! JSON-RPC client for the token contract's `balanceOf` view call.

use outlast_types::WalletAddress;
use serde::Deserialize;
use std::time::Duration;

use crate::{BalanceProvider, ChainError};

/// Function selector for `balanceOf(address)`.
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// Chain RPC calls get their own timeout, separate from whatever request
/// deadline the caller is under: RPC endpoints can hang.
const RPC_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    message: String,
}

/// HTTP client for reading token balances from a JSON-RPC endpoint.
pub struct TokenRpcClient {
    endpoint: String,
    contract_address: String,
    client: reqwest::Client,
}

impl TokenRpcClient {
    pub fn new(endpoint: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            contract_address: contract_address.into(),
            client: reqwest::Client::new(),
        }
    }

    /// ABI-encode the `balanceOf` call for a wallet address.
    fn call_data(&self, address: &WalletAddress) -> String {
        let hex_part = address
            .as_str()
            .strip_prefix("out_")
            .unwrap_or(address.as_str());
        format!("0x{BALANCE_OF_SELECTOR}{hex_part:0>64}")
    }

    /// Parse a `0x`-prefixed 256-bit hex quantity. Values above
    /// `u128::MAX` saturate rather than truncate, so a huge balance
    /// still reads as nonzero.
    fn parse_balance(result: &str) -> Result<u128, ChainError> {
        let digits = result.strip_prefix("0x").unwrap_or(result);
        if digits.is_empty() || digits.len() > 64 {
            return Err(ChainError::InvalidResponse(format!(
                "unexpected balance width: {result:?}"
            )));
        }
        let (high, low) = if digits.len() > 32 {
            digits.split_at(digits.len() - 32)
        } else {
            ("", digits)
        };
        if high.bytes().any(|b| !b.is_ascii_hexdigit()) {
            return Err(ChainError::InvalidResponse(format!(
                "balance {result:?}: invalid hex digit"
            )));
        }
        if high.bytes().any(|b| b != b'0') {
            return Ok(u128::MAX);
        }
        u128::from_str_radix(low, 16)
            .map_err(|e| ChainError::InvalidResponse(format!("balance {result:?}: {e}")))
    }
}

impl BalanceProvider for TokenRpcClient {
    async fn token_balance(&self, address: &WalletAddress) -> Result<u128, ChainError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                {
                    "to": self.contract_address,
                    "data": self.call_data(address),
                },
                "latest"
            ],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(RPC_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChainError::Upstream(e.to_string()))?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::Upstream(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(ChainError::Upstream(err.message));
        }
        let result = parsed
            .result
            .ok_or_else(|| ChainError::InvalidResponse("missing result field".into()))?;
        Self::parse_balance(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_data_embeds_selector_and_address() {
        let client = TokenRpcClient::new("http://localhost", "0xdead");
        let addr = WalletAddress::new(format!("out_{}", "ab".repeat(32)));
        let data = client.call_data(&addr);
        assert!(data.starts_with("0x70a08231"));
        assert!(data.ends_with(&"ab".repeat(32)));
        // 0x + 8 selector chars + 64 argument chars
        assert_eq!(data.len(), 2 + 8 + 64);
    }

    #[test]
    fn parse_balance_values() {
        assert_eq!(TokenRpcClient::parse_balance("0x0").unwrap(), 0);
        assert_eq!(TokenRpcClient::parse_balance("0x2a").unwrap(), 42);
        let padded = format!("0x{:0>64}", "1");
        assert_eq!(TokenRpcClient::parse_balance(&padded).unwrap(), 1);
    }

    #[test]
    fn parse_balance_saturates_above_u128() {
        // 2^128: one bit set just past the low 128 bits.
        let over = format!("0x{:0>64}", format!("1{}", "0".repeat(32)));
        assert_eq!(TokenRpcClient::parse_balance(&over).unwrap(), u128::MAX);
        let all_f = format!("0x{}", "f".repeat(64));
        assert_eq!(TokenRpcClient::parse_balance(&all_f).unwrap(), u128::MAX);
    }

    #[test]
    fn parse_balance_rejects_garbage() {
        assert!(TokenRpcClient::parse_balance("0x").is_err());
        assert!(TokenRpcClient::parse_balance("0xzz").is_err());
        let too_wide = format!("0x{}", "f".repeat(65));
        assert!(TokenRpcClient::parse_balance(&too_wide).is_err());
    }
}
