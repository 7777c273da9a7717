//! Outlast daemon — entry point for running the voting backend.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use outlast_chain::TokenRpcClient;
use outlast_game::EliminationScheduler;
use outlast_server::{AppState, ServerConfig};
use outlast_store_lmdb::LmdbStore;

#[derive(Parser)]
#[command(name = "outlast-daemon", about = "Outlast voting backend daemon")]
struct Cli {
    /// Port for the HTTP API.
    #[arg(long, env = "OUTLAST_PORT")]
    port: Option<u16>,

    /// Data directory for LMDB storage.
    #[arg(long, env = "OUTLAST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Secret for signing session tokens.
    #[arg(long, env = "OUTLAST_TOKEN_SECRET")]
    token_secret: Option<String>,

    /// JSON-RPC endpoint of the chain node.
    #[arg(long, env = "OUTLAST_RPC_ENDPOINT")]
    rpc_endpoint: Option<String>,

    /// Contract address of the qualifying NFT collection.
    #[arg(long, env = "OUTLAST_NFT_CONTRACT")]
    nft_contract: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "OUTLAST_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<(ServerConfig, Option<PathBuf>)> {
        let config_path = self.config;
        let mut config = match &config_path {
            Some(path) => ServerConfig::from_toml_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(token_secret) = self.token_secret {
            config.token_secret = token_secret;
        }
        if let Some(rpc_endpoint) = self.rpc_endpoint {
            config.rpc_endpoint = rpc_endpoint;
        }
        if let Some(nft_contract) = self.nft_contract {
            config.nft_contract = nft_contract;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        Ok((config, config_path))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_path) = Cli::parse().into_config()?;
    outlast_utils::init_tracing(&config.log_level, &config.log_format);

    if let Some(path) = config_path {
        tracing::info!("Loaded config from {}", path.display());
    }
    tracing::info!(
        "Starting Outlast backend (HTTP:{}, data: {}, chain: {})",
        config.port,
        config.data_dir.display(),
        config.rpc_endpoint,
    );

    let store = Arc::new(LmdbStore::open(&config.data_dir, config.map_size)?);

    let scheduler = EliminationScheduler::new(
        store.clone(),
        config.round_duration_secs,
        config.round_duration_secs,
    );
    tokio::spawn(scheduler.run());

    let provider = TokenRpcClient::new(config.rpc_endpoint.clone(), config.nft_contract.clone());
    let state = AppState::new(store, provider, &config);

    outlast_server::serve(state, config.port).await?;

    tracing::info!("Outlast daemon exited cleanly");
    Ok(())
}
