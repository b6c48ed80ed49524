//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ChainConfig (RPC URL, timeouts)
//!     → client.rs (ChainRpc trait, alloy HTTP provider with deadlines)
//!     → connect.rs (startup probe with bounded retry → Connection)
//!     → wallet.rs (key loading, generation, signing)
//!     → transaction.rs (nonce, sign, broadcast, wait for receipt)
//! ```
//!
//! # Security Constraints
//! - The funding key comes from configuration or the environment, never a literal
//! - Never log private keys
//! - Every RPC call and every receipt wait has a deadline

pub mod client;
pub mod connect;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use client::{ChainRpc, RpcClient};
pub use connect::{connect_with_retry, ConnectPolicy, Connection};
pub use transaction::{SubmitPolicy, Submitted, TxSubmitter};
pub use types::{BlockSelector, ChainError, ChainId, ChainResult};
pub use wallet::Wallet;
