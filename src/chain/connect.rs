//! Startup connection with bounded retry.
//!
//! # State
//! ```text
//! Disconnected ──probe ok + chain id──▶ Connected (held for process lifetime)
//!      │
//!      └── attempts exhausted ──▶ ChainError::Unreachable (startup aborts)
//! ```
//!
//! There is no reconnect path: once [`Connection`] exists it is never
//! re-established.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::chain::client::ChainRpc;
use crate::chain::types::{ChainConfig, ChainError, ChainId, ChainResult};
use crate::chain::units::{format_ether, format_gwei};

/// How hard to try before giving up on the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectPolicy {
    pub max_attempts: u32,
    /// Fixed pause between attempts; none after the last one.
    pub retry_delay: Duration,
}

impl From<&ChainConfig> for ConnectPolicy {
    fn from(config: &ChainConfig) -> Self {
        Self {
            max_attempts: config.connect_attempts,
            retry_delay: Duration::from_secs(config.connect_retry_delay_secs),
        }
    }
}

/// A verified connection to the chain endpoint.
#[derive(Clone)]
pub struct Connection {
    rpc: Arc<dyn ChainRpc>,
    chain_id: ChainId,
}

impl Connection {
    pub fn rpc(&self) -> Arc<dyn ChainRpc> {
        self.rpc.clone()
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("chain_id", &self.chain_id.0)
            .finish_non_exhaustive()
    }
}

/// Probe `rpc` until it answers or `policy.max_attempts` is used up.
pub async fn connect_with_retry(
    rpc: Arc<dyn ChainRpc>,
    policy: ConnectPolicy,
) -> ChainResult<Connection> {
    for attempt in 1..=policy.max_attempts {
        tracing::info!(attempt, max_attempts = policy.max_attempts, "Connecting to chain endpoint");

        match establish(rpc.as_ref()).await {
            Ok(chain_id) => {
                log_diagnostics(rpc.as_ref(), chain_id).await;
                return Ok(Connection { rpc, chain_id });
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Connection attempt failed");
            }
        }

        if attempt < policy.max_attempts {
            tracing::info!(delay_secs = policy.retry_delay.as_secs(), "Waiting before next attempt");
            sleep(policy.retry_delay).await;
        }
    }

    tracing::error!(attempts = policy.max_attempts, "Could not reach chain endpoint");
    Err(ChainError::Unreachable {
        attempts: policy.max_attempts,
    })
}

async fn establish(rpc: &dyn ChainRpc) -> ChainResult<ChainId> {
    rpc.probe().await?;
    rpc.chain_id().await
}

/// Best-effort network summary; lookups that fail are logged and skipped.
async fn log_diagnostics(rpc: &dyn ChainRpc, chain_id: ChainId) {
    tracing::info!(chain_id = chain_id.0, "Connected to chain endpoint");

    match rpc.accounts().await {
        Ok(accounts) => match accounts.first() {
            Some(first) => match rpc.balance(*first).await {
                Ok(balance) => tracing::info!(
                    account = %first,
                    balance_ether = %format_ether(balance),
                    "Reference account balance"
                ),
                Err(e) => tracing::warn!(account = %first, error = %e, "Balance lookup failed"),
            },
            None => tracing::info!("Node manages no accounts"),
        },
        Err(e) => tracing::warn!(error = %e, "Account listing failed"),
    }

    match rpc.gas_price().await {
        Ok(price) => tracing::info!(gas_price_gwei = %format_gwei(price), "Current gas price"),
        Err(e) => tracing::warn!(error = %e, "Gas price lookup failed"),
    }
}
