//! Account and transaction operations.
//!
//! Each operation validates its inputs, performs its chain calls strictly in
//! sequence, and returns a typed [`PortalError`] on failure. Nothing here is
//! retried, and write operations are not idempotent: resubmitting after a
//! timeout can pay twice if the first transaction was mined.

use alloy::primitives::{Address, U256};
use std::sync::Arc;

use crate::chain::client::ChainRpc;
use crate::chain::connect::Connection;
use crate::chain::transaction::{SubmitPolicy, Submitted, TxSubmitter};
use crate::chain::types::BlockSelector;
use crate::chain::units::{format_ether, parse_ether};
use crate::chain::wallet::Wallet;
use crate::config::schema::FundingConfig;
use crate::portal::error::{PortalError, PortalResult};
use crate::portal::types::{
    AccountBalance, BlockInfo, LoginInfo, NetworkStats, NewAccount, Overview, Registration,
    TransactionInfo, TransferReceipt, TxStatus,
};
use crate::portal::validate::{
    parse_address, parse_block_selector, parse_positive_amount, parse_private_key, parse_tx_hash,
};

/// Funding rules, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingRules {
    /// Credit for new accounts and registrations without an amount.
    pub default_credit: U256,
    pub max_credit: U256,
    pub reject_funded_addresses: bool,
}

impl FundingRules {
    pub fn from_config(config: &FundingConfig) -> PortalResult<Self> {
        let default_credit = parse_ether(&config.default_credit_ether).map_err(|e| {
            PortalError::validation(format!("funding.default_credit_ether: {}", e))
        })?;
        let max_credit = parse_ether(&config.max_credit_ether)
            .map_err(|e| PortalError::validation(format!("funding.max_credit_ether: {}", e)))?;

        Ok(Self {
            default_credit,
            max_credit,
            reject_funded_addresses: config.reject_funded_addresses,
        })
    }
}

/// The account/transaction facade.
pub struct Portal {
    rpc: Arc<dyn ChainRpc>,
    submitter: TxSubmitter,
    funding: Wallet,
    rules: FundingRules,
}

impl Portal {
    pub fn new(
        connection: &Connection,
        funding: Wallet,
        policy: SubmitPolicy,
        rules: FundingRules,
    ) -> Self {
        let rpc = connection.rpc();
        Self {
            submitter: TxSubmitter::new(rpc.clone(), policy),
            rpc,
            funding,
            rules,
        }
    }

    /// Address of the account that pays for registrations.
    pub fn funding_address(&self) -> Address {
        self.funding.address()
    }

    /// Live liveness probe.
    pub async fn is_healthy(&self) -> bool {
        self.rpc.probe().await.is_ok()
    }

    /// Node-managed accounts with balances.
    ///
    /// A failed balance lookup reports that account as zero instead of
    /// failing the whole listing.
    pub async fn accounts_with_balances(&self) -> PortalResult<Vec<AccountBalance>> {
        let accounts = self.rpc.accounts().await?;
        let mut listing = Vec::with_capacity(accounts.len());

        for address in accounts {
            let balance = match self.rpc.balance(address).await {
                Ok(balance) => balance,
                Err(e) => {
                    tracing::warn!(address = %address, error = %e, "Balance lookup failed, reporting zero");
                    U256::ZERO
                }
            };
            listing.push(AccountBalance::new(address, balance));
        }

        Ok(listing)
    }

    /// Credit `address` from the funding account.
    ///
    /// `amount_ether` defaults to the configured credit and may not exceed
    /// the configured maximum.
    pub async fn register(
        &self,
        address: &str,
        amount_ether: Option<&str>,
    ) -> PortalResult<Registration> {
        let address = parse_address(address)?;
        let amount = match amount_ether {
            Some(amount) => parse_positive_amount(amount)?,
            None => self.rules.default_credit,
        };
        if amount > self.rules.max_credit {
            return Err(PortalError::validation(format!(
                "amount exceeds the maximum credit of {} ether",
                format_ether(self.rules.max_credit)
            )));
        }

        if self.rules.reject_funded_addresses && !self.rpc.balance(address).await?.is_zero() {
            return Err(PortalError::AlreadyRegistered(address));
        }

        let submitted = self.fund(address, amount).await?;
        tracing::info!(address = %address, tx_hash = %submitted.hash, "Address registered");

        Ok(Registration {
            message: "address registered".to_string(),
            address,
            transaction_hash: submitted.hash,
            block_number: submitted.receipt.block_number,
            credited_wei: amount.to_string(),
            credited_ether: format_ether(amount),
        })
    }

    /// Look up an address. Presenting an address is all it takes.
    pub async fn login(&self, address: &str) -> PortalResult<LoginInfo> {
        let address = parse_address(address)?;

        let balance = self.rpc.balance(address).await?;
        let nonce = self.rpc.transaction_count(address).await?;
        let code = self.rpc.code(address).await?;

        Ok(LoginInfo {
            address,
            balance_wei: balance.to_string(),
            balance_ether: format_ether(balance),
            nonce,
            is_contract: !code.is_empty(),
        })
    }

    /// Send `amount_ether` from the holder of `private_key` to `to`.
    pub async fn transfer(
        &self,
        private_key: &str,
        to: &str,
        amount_ether: &str,
    ) -> PortalResult<TransferReceipt> {
        let to = parse_address(to)?;
        let sender = parse_private_key(private_key)?;
        let value = parse_positive_amount(amount_ether)?;
        let from = sender.address();

        let submitted = self.pay(&sender, to, value).await?;
        tracing::info!(from = %from, to = %to, tx_hash = %submitted.hash, "Transfer mined");

        Ok(TransferReceipt {
            transaction_hash: submitted.hash,
            block_number: submitted.receipt.block_number,
            status: TxStatus::from(&submitted.receipt),
            from,
            to,
            value_wei: value.to_string(),
            value_ether: format_ether(value),
            gas_used: submitted.receipt.gas_used,
            transaction_index: submitted.receipt.transaction_index,
        })
    }

    /// Generate a key pair and fund it with the default credit.
    pub async fn create_account(&self) -> PortalResult<NewAccount> {
        let wallet = Wallet::generate();
        let address = wallet.address();
        let amount = self.rules.default_credit;

        let submitted = self.fund(address, amount).await?;
        tracing::info!(address = %address, tx_hash = %submitted.hash, "Account created");

        Ok(NewAccount {
            address,
            private_key: wallet.private_key_hex(),
            funding_transaction_hash: submitted.hash,
            block_number: submitted.receipt.block_number,
            balance_wei: amount.to_string(),
            balance_ether: format_ether(amount),
        })
    }

    pub async fn block(&self, selector: &str) -> PortalResult<BlockInfo> {
        let parsed = parse_block_selector(selector)?;
        self.rpc
            .block(parsed)
            .await?
            .map(BlockInfo::from)
            .ok_or_else(|| PortalError::NotFound(describe_block(parsed)))
    }

    pub async fn transaction(&self, hash: &str) -> PortalResult<TransactionInfo> {
        let hash = parse_tx_hash(hash)?;

        let tx = self
            .rpc
            .transaction(hash)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("transaction {}", hash)))?;
        let receipt = self.rpc.receipt(hash).await?;

        Ok(TransactionInfo::new(tx, receipt))
    }

    pub async fn network_stats(&self) -> PortalResult<NetworkStats> {
        let latest = self
            .rpc
            .block(BlockSelector::Latest)
            .await?
            .ok_or_else(|| PortalError::NotFound("latest block".to_string()))?;
        let total_accounts = self.rpc.accounts().await?.len();
        let gas_price = self.rpc.gas_price().await?;
        let chain_id = self.rpc.chain_id().await?;

        Ok(NetworkStats::new(&latest, total_accounts, gas_price, chain_id.0))
    }

    /// Stats plus the account listing.
    pub async fn overview(&self) -> PortalResult<Overview> {
        Ok(Overview {
            stats: self.network_stats().await?,
            accounts: self.accounts_with_balances().await?,
        })
    }

    async fn fund(&self, to: Address, amount: U256) -> PortalResult<Submitted> {
        self.pay(&self.funding, to, amount).await
    }

    /// Check `payer` covers value plus worst-case fee, then submit.
    async fn pay(&self, payer: &Wallet, to: Address, value: U256) -> PortalResult<Submitted> {
        let available = self.rpc.balance(payer.address()).await?;
        let gas_price = self.rpc.gas_price().await?;
        let required = value.saturating_add(self.submitter.policy().max_fee(gas_price));

        if available < required {
            return Err(PortalError::InsufficientFunds {
                available,
                required,
            });
        }

        Ok(self.submitter.transfer(payer, to, value, gas_price).await?)
    }
}

impl std::fmt::Debug for Portal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Portal")
            .field("funding", &self.funding.address())
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

fn describe_block(selector: BlockSelector) -> String {
    match selector {
        BlockSelector::Latest => "latest block".to_string(),
        BlockSelector::Earliest => "earliest block".to_string(),
        BlockSelector::Pending => "pending block".to_string(),
        BlockSelector::Number(n) => format!("block {}", n),
    }
}
