//! Wei / ether conversions.
//!
//! Amounts cross the API as decimal strings so 256-bit values survive JSON.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;
use thiserror::Error;

/// Wei per ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("invalid amount '{0}'")]
    Invalid(String),
}

/// Parse a decimal ether amount such as `"10"` or `"0.25"` into wei.
///
/// At most 18 fractional digits are accepted.
pub fn parse_ether(input: &str) -> Result<U256, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::Negative);
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(AmountError::Invalid(trimmed.to_string()));
    }

    parse_units(trimmed, "ether")
        .map(Into::into)
        .map_err(|_| AmountError::Invalid(trimmed.to_string()))
}

/// Render wei as ether without trailing zeros (`"10"`, `"0.5"`).
pub fn format_ether(wei: U256) -> String {
    trim_fraction(format_units(wei, "ether").unwrap_or_else(|_| wei.to_string()))
}

/// Render a wei gas price in gwei.
pub fn format_gwei(wei: u128) -> String {
    trim_fraction(format_units(U256::from(wei), "gwei").unwrap_or_else(|_| wei.to_string()))
}

fn trim_fraction(mut value: String) -> String {
    if value.contains('.') {
        let keep = value.trim_end_matches('0').trim_end_matches('.').len();
        value.truncate(keep);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(parse_ether("10").unwrap(), U256::from(10 * WEI_PER_ETHER));
        assert_eq!(parse_ether("0.5").unwrap(), U256::from(WEI_PER_ETHER / 2));
        assert_eq!(parse_ether(" 1.000000000000000001 ").unwrap(), U256::from(WEI_PER_ETHER + 1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_ether(""), Err(AmountError::Empty));
        assert_eq!(parse_ether("-1"), Err(AmountError::Negative));
        assert!(matches!(parse_ether("1e18"), Err(AmountError::Invalid(_))));
        assert!(matches!(parse_ether("ten"), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_format_trims_zeros() {
        assert_eq!(format_ether(U256::from(10 * WEI_PER_ETHER)), "10");
        assert_eq!(format_ether(U256::from(WEI_PER_ETHER / 4)), "0.25");
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_gwei(2_500_000_000), "2.5");
    }
}
