//! Ethereum development-chain portal.
//!
//! Connects to a JSON-RPC node (Ganache, Anvil, ...) and exposes account and
//! transaction operations over a JSON HTTP API.

// Chain access
pub mod chain;
pub mod portal;

// Presentation
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::PortalConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use portal::{Portal, PortalError};
