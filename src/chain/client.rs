//! Chain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Name every JSON-RPC call the portal makes ([`ChainRpc`])
//! - Connect to the JSON-RPC endpoint over HTTP ([`RpcClient`])
//! - Enforce a deadline on every call
//! - Project library response types into the summaries in `types.rs`

use alloy::consensus::Transaction as _;
use alloy::network::{Ethereum, ReceiptResponse as _};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use std::future::{Future, IntoFuture};
use std::time::Duration;
use tokio::time::timeout;

use crate::chain::types::{
    BlockSelector, BlockSummary, ChainConfig, ChainError, ChainResult, ChainId, ReceiptSummary,
    TransactionSummary,
};

/// The JSON-RPC surface the portal depends on.
///
/// Every method is a single request to the node. Implementations must not
/// retry; retries are decided by the caller.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Lightweight liveness probe.
    async fn probe(&self) -> ChainResult<()>;

    async fn chain_id(&self) -> ChainResult<ChainId>;

    /// Accounts managed by the node (`eth_accounts`).
    async fn accounts(&self) -> ChainResult<Vec<Address>>;

    async fn balance(&self, address: Address) -> ChainResult<U256>;

    /// Transaction count, i.e. the next nonce for `address`.
    async fn transaction_count(&self, address: Address) -> ChainResult<u64>;

    async fn code(&self, address: Address) -> ChainResult<Bytes>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> ChainResult<u128>;

    async fn block_number(&self) -> ChainResult<u64>;

    async fn block(&self, selector: BlockSelector) -> ChainResult<Option<BlockSummary>>;

    async fn transaction(&self, hash: TxHash) -> ChainResult<Option<TransactionSummary>>;

    async fn receipt(&self, hash: TxHash) -> ChainResult<Option<ReceiptSummary>>;

    /// Broadcast an already signed, 2718-encoded transaction.
    async fn send_raw_transaction(&self, raw: Bytes) -> ChainResult<TxHash>;
}

/// HTTP JSON-RPC client backed by an alloy provider.
#[derive(Clone)]
pub struct RpcClient {
    provider: DynProvider<Ethereum>,
    rpc_url: String,
    timeout_duration: Duration,
}

impl RpcClient {
    /// Create a client for the configured endpoint.
    ///
    /// No request is made here; reachability is established by
    /// [`crate::chain::connect::connect_with_retry`].
    pub fn new(config: &ChainConfig) -> ChainResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            ChainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;

        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            provider,
            rpc_url: config.rpc_url.clone(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Endpoint this client talks to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call<T, F>(&self, method: &'static str, fut: F) -> ChainResult<T>
    where
        F: Future<Output = TransportResult<T>> + Send,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::debug!(method, error = %e, "RPC error");
                Err(ChainError::Rpc(format!("{method}: {e}")))
            }
            Err(_) => {
                tracing::debug!(method, "RPC timeout");
                Err(ChainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl ChainRpc for RpcClient {
    async fn probe(&self) -> ChainResult<()> {
        self.block_number().await.map(|_| ())
    }

    async fn chain_id(&self) -> ChainResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        self.call("eth_accounts", self.provider.get_accounts()).await
    }

    async fn balance(&self, address: Address) -> ChainResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address).into_future())
            .await
    }

    async fn transaction_count(&self, address: Address) -> ChainResult<u64> {
        self.call(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).into_future(),
        )
        .await
    }

    async fn code(&self, address: Address) -> ChainResult<Bytes> {
        self.call("eth_getCode", self.provider.get_code_at(address).into_future())
            .await
    }

    async fn gas_price(&self) -> ChainResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn block_number(&self) -> ChainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    async fn block(&self, selector: BlockSelector) -> ChainResult<Option<BlockSummary>> {
        let block = self
            .call(
                "eth_getBlockByNumber",
                self.provider.get_block_by_number(selector.into()).into_future(),
            )
            .await?;

        Ok(block.map(|block| BlockSummary {
            number: block.header.number,
            hash: block.header.hash,
            parent_hash: block.header.parent_hash,
            transaction_count: block.transactions.len(),
            timestamp: block.header.timestamp,
            difficulty: block.header.difficulty,
            gas_used: block.header.gas_used,
            gas_limit: block.header.gas_limit,
            miner: block.header.beneficiary,
            size: block.header.size,
        }))
    }

    async fn transaction(&self, hash: TxHash) -> ChainResult<Option<TransactionSummary>> {
        let tx = self
            .call(
                "eth_getTransactionByHash",
                self.provider.get_transaction_by_hash(hash).into_future(),
            )
            .await?;

        Ok(tx.map(|tx| TransactionSummary {
            hash: *tx.inner.tx_hash(),
            block_number: tx.block_number,
            from: tx.inner.signer(),
            to: tx.to(),
            value: tx.value(),
            gas: tx.gas_limit(),
            gas_price: tx.gas_price().or(tx.effective_gas_price),
            nonce: tx.nonce(),
        }))
    }

    async fn receipt(&self, hash: TxHash) -> ChainResult<Option<ReceiptSummary>> {
        let receipt = self
            .call(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(hash).into_future(),
            )
            .await?;

        Ok(receipt.map(|receipt| ReceiptSummary {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            transaction_index: receipt.transaction_index,
            gas_used: receipt.gas_used,
            success: receipt.status(),
        }))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> ChainResult<TxHash> {
        let result = timeout(
            self.timeout_duration,
            self.provider.send_raw_transaction(&raw),
        )
        .await;

        match result {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(ChainError::Rejected(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.timeout_duration.as_secs())),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
