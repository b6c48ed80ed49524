//! Shared utilities for integration tests: an in-memory chain.

#![allow(dead_code)]

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{Transaction as _, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use ether_portal::chain::client::ChainRpc;
use ether_portal::chain::types::{
    BlockSelector, BlockSummary, ChainError, ChainId, ChainResult, ReceiptSummary,
    TransactionSummary,
};
use ether_portal::config::PortalConfig;
use ether_portal::lifecycle::bootstrap_with;
use ether_portal::Portal;

/// Anvil's first development key; used as the funding account.
pub const FUNDING_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
/// Anvil's second development key.
pub const SECOND_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

pub const CHAIN_ID: u64 = 1337;
pub const GAS_PRICE: u128 = 20_000_000_000;
pub const TRANSFER_GAS: u64 = 21_000;

pub fn ether(amount: u64) -> U256 {
    U256::from(amount) * U256::from(1_000_000_000_000_000_000u128)
}

pub fn funding_address() -> Address {
    address_of(FUNDING_KEY)
}

pub fn address_of(key: &str) -> Address {
    ether_portal::chain::Wallet::from_private_key(key)
        .unwrap()
        .address()
}

/// Fee charged by the mock for one transfer.
pub fn transfer_fee() -> U256 {
    U256::from(TRANSFER_GAS) * U256::from(GAS_PRICE)
}

#[derive(Default)]
struct ChainState {
    balances: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    code: HashMap<Address, Bytes>,
    accounts: Vec<Address>,
    blocks: Vec<BlockSummary>,
    transactions: HashMap<TxHash, TransactionSummary>,
    receipts: HashMap<TxHash, ReceiptSummary>,
    failing_balances: HashSet<Address>,
    calls: Vec<&'static str>,
    sends: usize,
    reachable: bool,
    mining: bool,
}

/// In-memory chain that validates and applies real signed transactions.
///
/// Each accepted transaction is mined into its own block unless mining is
/// switched off, in which case it stays pending forever.
pub struct MockChain {
    state: Mutex<ChainState>,
}

impl MockChain {
    /// A chain whose node manages the funding account plus two others,
    /// each holding 100 ether.
    pub fn new() -> Arc<Self> {
        let mut state = ChainState {
            reachable: true,
            mining: true,
            ..ChainState::default()
        };
        for account in [
            funding_address(),
            address_of(SECOND_KEY),
            Address::repeat_byte(0x33),
        ] {
            state.accounts.push(account);
            state.balances.insert(account, ether(100));
        }
        state.blocks.push(block(0, 0));

        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    fn state(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: &'static str) -> ChainResult<MutexGuard<'_, ChainState>> {
        let mut state = self.state();
        state.calls.push(call);
        if !state.reachable {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(state)
    }

    pub fn set_balance(&self, address: Address, balance: U256) {
        self.state().balances.insert(address, balance);
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.state().balances.get(&address).copied().unwrap_or_default()
    }

    pub fn set_code(&self, address: Address, code: Bytes) {
        self.state().code.insert(address, code);
    }

    pub fn fail_balance_of(&self, address: Address) {
        self.state().failing_balances.insert(address);
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.state().reachable = reachable;
    }

    pub fn set_mining(&self, mining: bool) {
        self.state().mining = mining;
    }

    /// Number of raw transactions the node accepted or rejected.
    pub fn sends(&self) -> usize {
        self.state().sends
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn latest_block_number(&self) -> u64 {
        self.state().blocks.len() as u64 - 1
    }
}

fn block(number: u64, transaction_count: usize) -> BlockSummary {
    BlockSummary {
        number,
        hash: B256::with_last_byte(number as u8 + 1),
        parent_hash: if number == 0 {
            B256::ZERO
        } else {
            B256::with_last_byte(number as u8)
        },
        transaction_count,
        timestamp: 1_700_000_000 + number,
        difficulty: U256::ZERO,
        gas_used: transaction_count as u64 * TRANSFER_GAS,
        gas_limit: 6_721_975,
        miner: Address::ZERO,
        size: Some(U256::from(1_000)),
    }
}

#[async_trait]
impl ChainRpc for MockChain {
    async fn probe(&self) -> ChainResult<()> {
        self.record("probe").map(|_| ())
    }

    async fn chain_id(&self) -> ChainResult<ChainId> {
        self.record("chain_id").map(|_| ChainId(CHAIN_ID))
    }

    async fn accounts(&self) -> ChainResult<Vec<Address>> {
        Ok(self.record("accounts")?.accounts.clone())
    }

    async fn balance(&self, address: Address) -> ChainResult<U256> {
        let state = self.record("balance")?;
        if state.failing_balances.contains(&address) {
            return Err(ChainError::Rpc(format!("balance of {} unavailable", address)));
        }
        Ok(state.balances.get(&address).copied().unwrap_or_default())
    }

    async fn transaction_count(&self, address: Address) -> ChainResult<u64> {
        let state = self.record("transaction_count")?;
        Ok(state.nonces.get(&address).copied().unwrap_or_default())
    }

    async fn code(&self, address: Address) -> ChainResult<Bytes> {
        let state = self.record("code")?;
        Ok(state.code.get(&address).cloned().unwrap_or_default())
    }

    async fn gas_price(&self) -> ChainResult<u128> {
        self.record("gas_price").map(|_| GAS_PRICE)
    }

    async fn block_number(&self) -> ChainResult<u64> {
        let state = self.record("block_number")?;
        Ok(state.blocks.len() as u64 - 1)
    }

    async fn block(&self, selector: BlockSelector) -> ChainResult<Option<BlockSummary>> {
        let state = self.record("block")?;
        Ok(match selector {
            BlockSelector::Latest | BlockSelector::Pending => state.blocks.last().cloned(),
            BlockSelector::Earliest => state.blocks.first().cloned(),
            BlockSelector::Number(n) => state.blocks.get(n as usize).cloned(),
        })
    }

    async fn transaction(&self, hash: TxHash) -> ChainResult<Option<TransactionSummary>> {
        Ok(self.record("transaction")?.transactions.get(&hash).cloned())
    }

    async fn receipt(&self, hash: TxHash) -> ChainResult<Option<ReceiptSummary>> {
        Ok(self.record("receipt")?.receipts.get(&hash).cloned())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> ChainResult<TxHash> {
        let mut state = self.record("send_raw_transaction")?;
        state.sends += 1;

        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref())
            .map_err(|e| ChainError::Rejected(e.to_string()))?;
        let from = envelope
            .recover_signer()
            .map_err(|e| ChainError::Rejected(e.to_string()))?;
        let hash = *envelope.tx_hash();

        if envelope.chain_id() != Some(CHAIN_ID) {
            return Err(ChainError::Rejected("wrong chain id".to_string()));
        }
        let expected_nonce = state.nonces.get(&from).copied().unwrap_or_default();
        if envelope.nonce() != expected_nonce {
            return Err(ChainError::Rejected("nonce mismatch".to_string()));
        }

        let gas_price = envelope.gas_price().unwrap_or(GAS_PRICE);
        let cost = envelope.value() + U256::from(TRANSFER_GAS) * U256::from(gas_price);
        let balance = state.balances.get(&from).copied().unwrap_or_default();
        if balance < cost {
            return Err(ChainError::Rejected("insufficient funds for gas * price + value".to_string()));
        }
        let to = envelope.to().ok_or_else(|| ChainError::Rejected("no recipient".to_string()))?;

        state.balances.insert(from, balance - cost);
        *state.balances.entry(to).or_default() += envelope.value();
        state.nonces.insert(from, expected_nonce + 1);

        let block_number = if state.mining {
            let number = state.blocks.len() as u64;
            state.blocks.push(block(number, 1));
            state.receipts.insert(
                hash,
                ReceiptSummary {
                    transaction_hash: hash,
                    block_number: Some(number),
                    transaction_index: Some(0),
                    gas_used: TRANSFER_GAS,
                    success: true,
                },
            );
            Some(number)
        } else {
            None
        };

        state.transactions.insert(
            hash,
            TransactionSummary {
                hash,
                block_number,
                from,
                to: Some(to),
                value: envelope.value(),
                gas: envelope.gas_limit(),
                gas_price: Some(gas_price),
                nonce: envelope.nonce(),
            },
        );

        Ok(hash)
    }
}

/// Configuration with the funding key set and a short receipt wait.
pub fn test_config() -> PortalConfig {
    let mut config = PortalConfig::default();
    config.funding.private_key = Some(FUNDING_KEY.to_string());
    config.chain.connect_attempts = 1;
    config.chain.receipt_timeout_secs = 5;
    config
}

/// Build a portal over `chain` and forget the startup calls.
pub async fn portal_over(chain: &Arc<MockChain>) -> Portal {
    let portal = bootstrap_with(&test_config(), chain.clone()).await.unwrap();
    chain.clear_calls();
    portal
}
