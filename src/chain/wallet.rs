//! Key handling and transaction signing.
//!
//! # Security
//! - The funding key is loaded from configuration or the environment only
//! - Keys are never logged; `Debug` prints the address alone
//! - [`Wallet::private_key_hex`] is the single place a key leaves this type

use alloy::eips::eip2718::Encodable2718;
use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;

use crate::chain::types::{ChainError, ChainResult};

/// Environment variable name for the funding account's private key.
pub const FUNDING_KEY_ENV_VAR: &str = "PORTAL_FUNDING_PRIVATE_KEY";

/// Everything needed to sign a plain value transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferParams {
    pub to: Address,
    pub value: U256,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Legacy gas price in wei.
    pub gas_price: u128,
    pub chain_id: u64,
}

/// A signed, 2718-encoded transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub hash: TxHash,
    pub raw: Bytes,
}

/// A local signing key.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// Accepts the key with or without a `0x` prefix.
    pub fn from_private_key(private_key_hex: &str) -> ChainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self { signer })
    }

    /// Load the funding wallet from `PORTAL_FUNDING_PRIVATE_KEY`.
    pub fn from_env() -> ChainResult<Self> {
        let private_key = std::env::var(FUNDING_KEY_ENV_VAR).map_err(|_| {
            ChainError::Wallet(format!(
                "Environment variable {} not set",
                FUNDING_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key)
    }

    /// Generate a fresh random key pair.
    pub fn generate() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The raw private key as `0x`-prefixed hex.
    pub fn private_key_hex(&self) -> String {
        format!("{:#x}", self.signer.to_bytes())
    }

    /// Sign a legacy (EIP-155) value transfer.
    ///
    /// Legacy gas pricing is used because development chains such as
    /// Ganache do not all accept 1559 fee fields.
    pub async fn sign_transfer(&self, params: TransferParams) -> ChainResult<SignedTx> {
        let request = TransactionRequest::default()
            .with_from(self.address())
            .with_to(params.to)
            .with_value(params.value)
            .with_nonce(params.nonce)
            .with_gas_limit(params.gas_limit)
            .with_gas_price(params.gas_price)
            .with_chain_id(params.chain_id);

        let signer = EthereumWallet::from(self.signer.clone());
        let envelope = request
            .build(&signer)
            .await
            .map_err(|e| ChainError::Wallet(format!("Signing failed: {}", e)))?;

        Ok(SignedTx {
            hash: *envelope.tx_hash(),
            raw: Bytes::from(envelope.encoded_2718()),
        })
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
