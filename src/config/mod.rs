//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PORTAL_RPC_URL, PORTAL_FUNDING_PRIVATE_KEY, ...)
//!     → validation.rs (semantic checks)
//!     → PortalConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs, except the funding
//!   key, which must be supplied
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ChainConfig;
pub use schema::FundingConfig;
pub use schema::ObservabilityConfig;
pub use schema::PortalConfig;
pub use schema::ServerConfig;
