//! Error taxonomy for portal operations.
//!
//! Every failure a caller can observe is one of a small closed set of kinds.
//! Human-readable text comes from `Display` and is only rendered at the
//! presentation boundary.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::types::ChainError;
use crate::chain::units::format_ether;

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InsufficientFunds,
    AlreadyRegistered,
    Unavailable,
    NotFound,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::AlreadyRegistered => "already_registered",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Timeout => "timeout",
        }
    }
}

/// Errors returned by portal operations.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Caller input is malformed; nothing was sent to the chain.
    #[error("{0}")]
    Validation(String),

    /// The paying account cannot cover value plus fees.
    #[error(
        "insufficient funds: {} ether available, {} ether required",
        ether(.available),
        ether(.required)
    )]
    InsufficientFunds { available: U256, required: U256 },

    /// Registration target already holds a balance.
    #[error("address {0} is already registered")]
    AlreadyRegistered(Address),

    /// The chain endpoint failed or rejected the request.
    #[error("chain unavailable: {0}")]
    Unavailable(String),

    /// The requested block or transaction does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A deadline passed; a broadcast transaction may still be mined.
    #[error("timed out: {0}")]
    Timeout(String),
}

fn ether(value: &U256) -> String {
    format_ether(*value)
}

impl PortalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::Validation(_) => ErrorKind::Validation,
            PortalError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            PortalError::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
            PortalError::Unavailable(_) => ErrorKind::Unavailable,
            PortalError::NotFound(_) => ErrorKind::NotFound,
            PortalError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation(message.into())
    }
}

impl From<ChainError> for PortalError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::Timeout(_) | ChainError::ReceiptTimeout(_) => {
                PortalError::Timeout(err.to_string())
            }
            ChainError::Wallet(msg) => PortalError::Validation(msg),
            ChainError::Rpc(_) | ChainError::Unreachable { .. } | ChainError::Rejected(_) => {
                PortalError::Unavailable(err.to_string())
            }
        }
    }
}

/// Result type for portal operations.
pub type PortalResult<T> = Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::TxHash;

    #[test]
    fn test_chain_errors_map_to_kinds() {
        let cases = [
            (ChainError::Timeout(10), ErrorKind::Timeout),
            (ChainError::ReceiptTimeout(TxHash::ZERO), ErrorKind::Timeout),
            (ChainError::Rpc("refused".into()), ErrorKind::Unavailable),
            (ChainError::Rejected("nonce too low".into()), ErrorKind::Unavailable),
            (ChainError::Wallet("bad key".into()), ErrorKind::Validation),
        ];
        for (chain_err, kind) in cases {
            assert_eq!(PortalError::from(chain_err).kind(), kind);
        }
    }

    #[test]
    fn test_insufficient_funds_message_in_ether() {
        let err = PortalError::InsufficientFunds {
            available: U256::from(500_000_000_000_000_000u128),
            required: U256::from(2_000_000_000_000_000_000u128),
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: 0.5 ether available, 2 ether required"
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::AlreadyRegistered).unwrap();
        assert_eq!(json, "\"already_registered\"");
        assert_eq!(ErrorKind::AlreadyRegistered.as_str(), "already_registered");
    }
}
