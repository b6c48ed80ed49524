//! Input validation for portal operations.
//!
//! Every parser here runs before any chain call, so malformed input never
//! reaches the node.

use alloy::primitives::{Address, TxHash, U256};

use crate::chain::types::BlockSelector;
use crate::chain::units::parse_ether;
use crate::chain::wallet::Wallet;
use crate::portal::error::{PortalError, PortalResult};

/// Parse a `0x`-prefixed 20-byte address.
///
/// All-lowercase and all-uppercase hex are accepted as-is; mixed case must
/// carry a valid EIP-55 checksum.
pub fn parse_address(input: &str) -> PortalResult<Address> {
    let trimmed = input.trim();
    let invalid = || PortalError::validation(format!("invalid address '{}'", trimmed));

    let hex = trimmed.strip_prefix("0x").ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(trimmed, None).map_err(|_| {
            PortalError::validation(format!("address '{}' has an invalid checksum", trimmed))
        });
    }

    trimmed.parse::<Address>().map_err(|_| invalid())
}

/// Parse a `0x`-prefixed 32-byte transaction hash.
pub fn parse_tx_hash(input: &str) -> PortalResult<TxHash> {
    let trimmed = input.trim();
    let well_formed = trimmed
        .strip_prefix("0x")
        .is_some_and(|hex| hex.len() == 64 && hex.chars().all(|c| c.is_ascii_hexdigit()));

    if !well_formed {
        return Err(PortalError::validation(format!(
            "invalid transaction hash '{}'",
            trimmed
        )));
    }

    trimmed
        .parse::<TxHash>()
        .map_err(|e| PortalError::validation(format!("invalid transaction hash: {}", e)))
}

/// Parse `latest`, `earliest`, `pending`, a decimal number or a `0x` number.
pub fn parse_block_selector(input: &str) -> PortalResult<BlockSelector> {
    let trimmed = input.trim();
    let invalid = || PortalError::validation(format!("invalid block number '{}'", trimmed));

    match trimmed.to_ascii_lowercase().as_str() {
        "" | "latest" => Ok(BlockSelector::Latest),
        "earliest" => Ok(BlockSelector::Earliest),
        "pending" => Ok(BlockSelector::Pending),
        other => {
            let number = match other.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16).map_err(|_| invalid())?,
                None => other.parse::<u64>().map_err(|_| invalid())?,
            };
            Ok(BlockSelector::Number(number))
        }
    }
}

/// Load a signing key supplied by a caller. The key is never echoed back.
pub fn parse_private_key(input: &str) -> PortalResult<Wallet> {
    Wallet::from_private_key(input).map_err(|_| PortalError::validation("invalid private key"))
}

/// Parse a strictly positive ether amount into wei.
pub fn parse_positive_amount(input: &str) -> PortalResult<U256> {
    let wei = parse_ether(input).map_err(|e| PortalError::validation(e.to_string()))?;
    if wei.is_zero() {
        return Err(PortalError::validation("amount must be greater than zero"));
    }
    Ok(wei)
}
