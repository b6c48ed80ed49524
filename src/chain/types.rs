//! Chain-specific types and error definitions.

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, TxHash, B256, U256};
use thiserror::Error;

// Re-export ChainConfig from config module to avoid duplication
pub use crate::config::schema::ChainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Endpoint never answered the liveness probe during startup.
    #[error("Endpoint unreachable after {attempts} attempts")]
    Unreachable { attempts: u32 },

    /// No receipt was observed before the wait deadline.
    #[error("No receipt for transaction {0} before deadline")]
    ReceiptTimeout(TxHash),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Node rejected the raw transaction.
    #[error("Broadcast rejected: {0}")]
    Rejected(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Which block to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSelector {
    Latest,
    Earliest,
    Pending,
    Number(u64),
}

impl From<BlockSelector> for BlockNumberOrTag {
    fn from(selector: BlockSelector) -> Self {
        match selector {
            BlockSelector::Latest => BlockNumberOrTag::Latest,
            BlockSelector::Earliest => BlockNumberOrTag::Earliest,
            BlockSelector::Pending => BlockNumberOrTag::Pending,
            BlockSelector::Number(n) => BlockNumberOrTag::Number(n),
        }
    }
}

/// Header fields of a block, projected out of the RPC response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub transaction_count: usize,
    pub timestamp: u64,
    pub difficulty: U256,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub miner: Address,
    pub size: Option<U256>,
}

/// A transaction as seen by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSummary {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub gas: u64,
    pub gas_price: Option<u128>,
    pub nonce: u64,
}

/// Inclusion record for a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    pub gas_used: u64,
    pub success: bool,
}
