//! Startup orchestration.
//!
//! # Order
//! 1. Funding wallet from (validated) configuration
//! 2. RPC client, then connect with bounded retry
//! 3. Facade over the verified connection
//!
//! Any failure is fatal: the process does not start in a degraded state.

use std::sync::Arc;
use thiserror::Error;

use crate::chain::client::{ChainRpc, RpcClient};
use crate::chain::connect::{connect_with_retry, ConnectPolicy};
use crate::chain::transaction::SubmitPolicy;
use crate::chain::types::ChainError;
use crate::chain::wallet::Wallet;
use crate::config::PortalConfig;
use crate::portal::{FundingRules, Portal, PortalError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("funding wallet: {0}")]
    Wallet(ChainError),

    #[error("funding rules: {0}")]
    Funding(PortalError),

    #[error("chain connection: {0}")]
    Chain(#[from] ChainError),
}

/// Build the facade against the configured endpoint.
pub async fn bootstrap(config: &PortalConfig) -> Result<Portal, StartupError> {
    let rpc: Arc<dyn ChainRpc> = Arc::new(RpcClient::new(&config.chain)?);
    bootstrap_with(config, rpc).await
}

/// Build the facade over an existing chain client.
pub async fn bootstrap_with(
    config: &PortalConfig,
    rpc: Arc<dyn ChainRpc>,
) -> Result<Portal, StartupError> {
    let funding = match config.funding.private_key.as_deref() {
        Some(key) => Wallet::from_private_key(key),
        None => Wallet::from_env(),
    }
    .map_err(StartupError::Wallet)?;
    let rules = FundingRules::from_config(&config.funding).map_err(StartupError::Funding)?;

    tracing::info!(
        rpc_url = %config.chain.rpc_url,
        funding_address = %funding.address(),
        "Starting chain connection"
    );

    let connection = connect_with_retry(rpc, ConnectPolicy::from(&config.chain)).await?;

    Ok(Portal::new(
        &connection,
        funding,
        SubmitPolicy::from(&config.chain),
        rules,
    ))
}
