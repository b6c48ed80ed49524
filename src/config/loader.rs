//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::chain::wallet::FUNDING_KEY_ENV_VAR;
use crate::config::schema::PortalConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the RPC endpoint URL.
pub const RPC_URL_ENV_VAR: &str = "PORTAL_RPC_URL";

/// Overrides the HTTP bind address.
pub const BIND_ADDRESS_ENV_VAR: &str = "PORTAL_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<PortalConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration: file (or defaults), then environment overrides, then
/// validation.
pub fn load_config(path: Option<&Path>) -> Result<PortalConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => PortalConfig::default(),
    };

    apply_overrides(&mut config, |name| std::env::var(name).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_overrides<F>(config: &mut PortalConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RPC_URL_ENV_VAR) {
        config.chain.rpc_url = url;
    }
    if let Some(addr) = lookup(BIND_ADDRESS_ENV_VAR) {
        config.server.bind_address = addr;
    }
    if let Some(key) = lookup(FUNDING_KEY_ENV_VAR) {
        config.funding.private_key = Some(key);
    }
}
