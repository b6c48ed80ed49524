//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Honour `RUST_LOG` first, then the configured level
//! - Switch between human-readable and JSON output
//!
//! Private keys never appear in log fields; wallet and config types redact
//! them in their `Debug` output.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub fn default_directive(level: &str) -> String {
    format!("ether_portal={level},tower_http={level}")
}

/// Install the global subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init_logging(
    config: &ObservabilityConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}
