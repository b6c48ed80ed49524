//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, attempts ≥ 1)
//! - Check the funding key is present and well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortalConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::chain::units::parse_ether;
use crate::chain::wallet::Wallet;
use crate::config::schema::PortalConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("chain.rpc_url: {0}")]
    InvalidRpcUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("chain.gas_limit must be at least 21000, got {0}")]
    GasLimitTooLow(u64),

    #[error("chain.receipt_poll_max_ms must not be below chain.receipt_poll_base_ms")]
    PollRange,

    #[error("server.request_timeout_secs must exceed chain.receipt_timeout_secs")]
    RequestShorterThanReceiptWait,

    #[error("funding.private_key is required (or set PORTAL_FUNDING_PRIVATE_KEY)")]
    MissingFundingKey,

    #[error("funding.private_key is not a valid private key")]
    InvalidFundingKey,

    #[error("{field}: {reason}")]
    InvalidAmount { field: &'static str, reason: String },
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.server.request_timeout_secs <= config.chain.receipt_timeout_secs {
        errors.push(ValidationError::RequestShorterThanReceiptWait);
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("server.max_body_bytes"));
    }

    let chain = &config.chain;
    match url::Url::parse(&chain.rpc_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidRpcUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        ))),
        Err(e) => errors.push(ValidationError::InvalidRpcUrl(e.to_string())),
    }
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::Zero("chain.rpc_timeout_secs"));
    }
    if chain.connect_attempts == 0 {
        errors.push(ValidationError::Zero("chain.connect_attempts"));
    }
    if chain.gas_limit < 21_000 {
        errors.push(ValidationError::GasLimitTooLow(chain.gas_limit));
    }
    if chain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::Zero("chain.receipt_timeout_secs"));
    }
    if chain.receipt_poll_base_ms == 0 {
        errors.push(ValidationError::Zero("chain.receipt_poll_base_ms"));
    }
    if chain.receipt_poll_max_ms < chain.receipt_poll_base_ms {
        errors.push(ValidationError::PollRange);
    }

    let funding = &config.funding;
    match funding.private_key.as_deref() {
        None | Some("") => errors.push(ValidationError::MissingFundingKey),
        Some(key) => {
            if Wallet::from_private_key(key).is_err() {
                errors.push(ValidationError::InvalidFundingKey);
            }
        }
    }

    let default_credit = parse_ether(&funding.default_credit_ether);
    let max_credit = parse_ether(&funding.max_credit_ether);
    match &default_credit {
        Ok(v) if v.is_zero() => errors.push(ValidationError::Zero("funding.default_credit_ether")),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidAmount {
            field: "funding.default_credit_ether",
            reason: e.to_string(),
        }),
    }
    match (&default_credit, &max_credit) {
        (Ok(default), Ok(max)) if max < default => errors.push(ValidationError::InvalidAmount {
            field: "funding.max_credit_ether",
            reason: "must not be below funding.default_credit_ether".to_string(),
        }),
        (_, Err(e)) => errors.push(ValidationError::InvalidAmount {
            field: "funding.max_credit_ether",
            reason: e.to_string(),
        }),
        _ => {}
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn valid() -> PortalConfig {
        let mut config = PortalConfig::default();
        config.funding.private_key = Some(TEST_PRIVATE_KEY.to_string());
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_missing_funding_key_rejected() {
        let errors = validate_config(&PortalConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingFundingKey]);
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = valid();
        config.chain.connect_attempts = 0;
        config.chain.rpc_url = "ftp://node".to_string();
        config.funding.private_key = Some("nope".to_string());
        config.funding.max_credit_ether = "1".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::Zero("chain.connect_attempts")));
        assert!(errors.contains(&ValidationError::InvalidFundingKey));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidRpcUrl(_))));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidAmount { field: "funding.max_credit_ether", .. })));
    }

    #[test]
    fn test_request_timeout_must_cover_receipt_wait() {
        let mut config = valid();
        config.server.request_timeout_secs = 60;
        config.chain.receipt_timeout_secs = 120;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::RequestShorterThanReceiptWait])
        );
    }
}
