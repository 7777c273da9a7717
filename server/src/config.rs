//! Server configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Configuration for the Outlast backend.
///
/// Can be loaded from a TOML file via [`ServerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on for HTTP connections.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Data directory for LMDB storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Secret for signing session tokens. Must be overridden outside dev.
    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// JSON-RPC endpoint of the chain node used for eligibility checks.
    #[serde(default = "default_rpc_endpoint")]
    pub rpc_endpoint: String,

    /// Contract address of the qualifying NFT collection.
    #[serde(default)]
    pub nft_contract: String,

    /// Voting round length in seconds.
    #[serde(default = "default_round_duration_secs")]
    pub round_duration_secs: u64,

    /// Rate limit window in seconds.
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Maximum vote submissions per key per window.
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: usize,

    /// Reward amount granted per qualifying round, in display units.
    #[serde(default = "default_reward_amount")]
    pub reward_amount: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_port() -> u16 {
    3001
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./outlast_data")
}

fn default_map_size() -> usize {
    1024 * 1024 * 1024
}

fn default_token_secret() -> String {
    "dev-secret-change-me".to_string()
}

fn default_token_ttl_secs() -> u64 {
    outlast_identity::DEFAULT_TOKEN_TTL_SECS
}

fn default_rpc_endpoint() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_round_duration_secs() -> u64 {
    outlast_game::DEFAULT_ROUND_DURATION_SECS
}

fn default_rate_limit_window_secs() -> u64 {
    outlast_game::limiter::DEFAULT_WINDOW_SECS
}

fn default_rate_limit_max() -> usize {
    outlast_game::limiter::DEFAULT_MAX_ATTEMPTS
}

fn default_reward_amount() -> u64 {
    100
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            token_secret: default_token_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            rpc_endpoint: default_rpc_endpoint(),
            nft_contract: String::new(),
            round_duration_secs: default_round_duration_secs(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_max: default_rate_limit_max(),
            reward_amount: default_reward_amount(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError(e.to_string()))
    }
}
