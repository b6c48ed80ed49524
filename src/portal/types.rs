//! Result payloads returned by portal operations.
//!
//! Wei amounts are decimal strings and ether amounts are trimmed decimal
//! strings, so 256-bit values survive JSON intact.

use alloy::primitives::{Address, TxHash, B256, U256};
use serde::{Deserialize, Serialize};

use crate::chain::types::{BlockSummary, ReceiptSummary, TransactionSummary};
use crate::chain::units::{format_ether, format_gwei};

/// A node-managed account and its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub address: Address,
    pub balance_wei: String,
    pub balance_ether: String,
}

impl AccountBalance {
    pub fn new(address: Address, balance: U256) -> Self {
        Self {
            address,
            balance_wei: balance.to_string(),
            balance_ether: format_ether(balance),
        }
    }
}

/// Outcome of crediting a newly registered address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub message: String,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub credited_wei: String,
    pub credited_ether: String,
}

/// Identity lookup for an address. Not an authentication result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInfo {
    pub address: Address,
    pub balance_wei: String,
    pub balance_ether: String,
    pub nonce: u64,
    pub is_contract: bool,
}

/// Execution status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Success,
    Reverted,
    /// No receipt yet.
    Pending,
}

impl From<&ReceiptSummary> for TxStatus {
    fn from(receipt: &ReceiptSummary) -> Self {
        if receipt.success {
            TxStatus::Success
        } else {
            TxStatus::Reverted
        }
    }
}

/// Mined value transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub status: TxStatus,
    pub from: Address,
    pub to: Address,
    pub value_wei: String,
    pub value_ether: String,
    pub gas_used: u64,
    pub transaction_index: Option<u64>,
}

/// A freshly generated, funded account.
///
/// `private_key` is disclosed here and nowhere else; the portal keeps no copy.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub address: Address,
    pub private_key: String,
    pub funding_transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub balance_wei: String,
    pub balance_ether: String,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("address", &self.address)
            .field("funding_transaction_hash", &self.funding_transaction_hash)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub transaction_count: usize,
    pub timestamp: u64,
    pub difficulty: String,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub miner: Address,
    pub size: Option<u64>,
}

impl From<BlockSummary> for BlockInfo {
    fn from(block: BlockSummary) -> Self {
        Self {
            number: block.number,
            hash: block.hash,
            parent_hash: block.parent_hash,
            transaction_count: block.transaction_count,
            timestamp: block.timestamp,
            difficulty: block.difficulty.to_string(),
            gas_used: block.gas_used,
            gas_limit: block.gas_limit,
            miner: block.miner,
            size: block.size.map(|size| size.saturating_to::<u64>()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInfo {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub from: Address,
    pub to: Option<Address>,
    pub value_wei: String,
    pub value_ether: String,
    pub gas: u64,
    pub gas_price_wei: Option<String>,
    pub nonce: u64,
    pub status: TxStatus,
    pub gas_used: Option<u64>,
}

impl TransactionInfo {
    pub fn new(tx: TransactionSummary, receipt: Option<ReceiptSummary>) -> Self {
        Self {
            hash: tx.hash,
            block_number: tx.block_number,
            from: tx.from,
            to: tx.to,
            value_wei: tx.value.to_string(),
            value_ether: format_ether(tx.value),
            gas: tx.gas,
            gas_price_wei: tx.gas_price.map(|price| price.to_string()),
            nonce: tx.nonce,
            status: receipt.as_ref().map(TxStatus::from).unwrap_or(TxStatus::Pending),
            gas_used: receipt.map(|r| r.gas_used),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub block_number: u64,
    pub total_accounts: usize,
    pub gas_price_wei: String,
    pub gas_price_gwei: String,
    pub chain_id: u64,
    pub latest_block_timestamp: u64,
    pub gas_limit: u64,
}

impl NetworkStats {
    pub fn new(latest: &BlockSummary, total_accounts: usize, gas_price: u128, chain_id: u64) -> Self {
        Self {
            block_number: latest.number,
            total_accounts,
            gas_price_wei: gas_price.to_string(),
            gas_price_gwei: format_gwei(gas_price),
            chain_id,
            latest_block_timestamp: latest.timestamp,
            gas_limit: latest.gas_limit,
        }
    }
}

/// Landing-page summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub stats: NetworkStats,
    pub accounts: Vec<AccountBalance>,
}
