//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portal.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the portal.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Chain endpoint, retry and gas settings.
    pub chain: ChainConfig,

    /// Funding account used for registrations and new accounts.
    pub funding: FundingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Total time allowed per request in seconds.
    ///
    /// Must exceed `chain.receipt_timeout_secs`, since write operations wait
    /// for a receipt inside the request.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            request_timeout_secs: 300,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Chain endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Startup connection attempts before giving up.
    pub connect_attempts: u32,

    /// Pause between startup connection attempts in seconds.
    pub connect_retry_delay_secs: u64,

    /// Gas limit for plain value transfers.
    pub gas_limit: u64,

    /// Deadline for observing a receipt after broadcast, in seconds.
    pub receipt_timeout_secs: u64,

    /// First receipt poll delay in milliseconds (doubles per poll).
    pub receipt_poll_base_ms: u64,

    /// Upper bound on the receipt poll delay in milliseconds.
    pub receipt_poll_max_ms: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            rpc_timeout_secs: 10,
            connect_attempts: 10,
            connect_retry_delay_secs: 3,
            gas_limit: 21_000,
            receipt_timeout_secs: 120,
            receipt_poll_base_ms: 250,
            receipt_poll_max_ms: 2_000,
        }
    }
}

/// Funding account configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FundingConfig {
    /// Hex private key of the funding account. No default; must be supplied
    /// here or through `PORTAL_FUNDING_PRIVATE_KEY`.
    #[serde(skip_serializing)]
    pub private_key: Option<String>,

    /// Ether credited on registration when the caller names no amount, and
    /// to every newly created account.
    pub default_credit_ether: String,

    /// Largest registration credit a caller may request, in ether.
    pub max_credit_ether: String,

    /// Refuse to register addresses that already hold a balance.
    pub reject_funded_addresses: bool,
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            default_credit_ether: "10".to_string(),
            max_credit_ether: "1000".to_string(),
            reject_funded_addresses: true,
        }
    }
}

impl std::fmt::Debug for FundingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundingConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("default_credit_ether", &self.default_credit_ether)
            .field("max_credit_ether", &self.max_credit_ether)
            .field("reject_funded_addresses", &self.reject_funded_addresses)
            .finish()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
