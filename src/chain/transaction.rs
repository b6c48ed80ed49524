//! Transaction submission and receipt monitoring.
//!
//! # Responsibilities
//! - Fetch a fresh nonce and chain id immediately before signing
//! - Sign and broadcast value transfers
//! - Wait for the receipt under a deadline, polling with backoff

use alloy::primitives::{Address, TxHash, U256};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::chain::client::ChainRpc;
use crate::chain::types::{ChainConfig, ChainError, ChainResult, ReceiptSummary};
use crate::chain::wallet::{TransferParams, Wallet};
use crate::resilience::backoff::Backoff;

/// Gas and receipt-wait settings for submitted transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPolicy {
    /// Gas limit for a plain value transfer.
    pub gas_limit: u64,
    /// Overall deadline for observing a receipt.
    pub receipt_timeout: Duration,
    pub poll_base_ms: u64,
    pub poll_max_ms: u64,
}

impl From<&ChainConfig> for SubmitPolicy {
    fn from(config: &ChainConfig) -> Self {
        Self {
            gas_limit: config.gas_limit,
            receipt_timeout: Duration::from_secs(config.receipt_timeout_secs),
            poll_base_ms: config.receipt_poll_base_ms,
            poll_max_ms: config.receipt_poll_max_ms,
        }
    }
}

impl SubmitPolicy {
    /// Worst-case fee for a transfer at `gas_price`.
    pub fn max_fee(&self, gas_price: u128) -> U256 {
        U256::from(self.gas_limit) * U256::from(gas_price)
    }
}

/// Outcome of a transaction that made it into a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submitted {
    pub hash: TxHash,
    pub receipt: ReceiptSummary,
}

/// Signs, broadcasts and confirms value transfers.
#[derive(Clone)]
pub struct TxSubmitter {
    rpc: Arc<dyn ChainRpc>,
    policy: SubmitPolicy,
}

impl TxSubmitter {
    pub fn new(rpc: Arc<dyn ChainRpc>, policy: SubmitPolicy) -> Self {
        Self { rpc, policy }
    }

    pub fn policy(&self) -> &SubmitPolicy {
        &self.policy
    }

    /// Send `value` from `wallet` to `to` and block until it is mined.
    ///
    /// `gas_price` is the price the caller used for its balance check, so the
    /// signed transaction never costs more than what was checked.
    pub async fn transfer(
        &self,
        wallet: &Wallet,
        to: Address,
        value: U256,
        gas_price: u128,
    ) -> ChainResult<Submitted> {
        let nonce = self.rpc.transaction_count(wallet.address()).await?;
        let chain_id = self.rpc.chain_id().await?;

        let signed = wallet
            .sign_transfer(TransferParams {
                to,
                value,
                nonce,
                gas_limit: self.policy.gas_limit,
                gas_price,
                chain_id: chain_id.0,
            })
            .await?;

        let hash = self.rpc.send_raw_transaction(signed.raw).await?;
        if hash != signed.hash {
            tracing::warn!(
                local = %signed.hash,
                remote = %hash,
                "Node reported a different transaction hash"
            );
        }

        tracing::info!(
            tx_hash = %hash,
            from = %wallet.address(),
            to = %to,
            nonce = nonce,
            "Transaction broadcast"
        );

        let receipt = self.wait_for_receipt(hash).await?;
        Ok(Submitted { hash, receipt })
    }

    /// Poll for a receipt until one appears or the deadline passes.
    ///
    /// RPC errors while polling are logged and polling continues; only the
    /// deadline ends the wait unsuccessfully.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> ChainResult<ReceiptSummary> {
        let mut backoff = Backoff::new(self.policy.poll_base_ms, self.policy.poll_max_ms);

        let result = timeout(self.policy.receipt_timeout, async {
            loop {
                match self.rpc.receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    Err(e) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed");
                    }
                }
                sleep(backoff.next_delay()).await;
            }
        })
        .await;

        match result {
            Ok(receipt) => {
                tracing::debug!(
                    tx_hash = %tx_hash,
                    polls = backoff.attempts() + 1,
                    "Receipt observed"
                );
                Ok(receipt)
            }
            Err(_) => Err(ChainError::ReceiptTimeout(tx_hash)),
        }
    }
}
