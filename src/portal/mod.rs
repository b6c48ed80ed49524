//! Account/transaction facade.
//!
//! # Data Flow
//! ```text
//! caller input (strings)
//!     → validate.rs (addresses, hashes, amounts, keys; no chain calls)
//!     → service.rs (chain reads, balance checks, submission)
//!     → types.rs payloads | error.rs PortalError
//!     → presentation layer renders the envelope
//! ```

pub mod error;
pub mod service;
pub mod types;
pub mod validate;

pub use error::{ErrorKind, PortalError, PortalResult};
pub use service::{FundingRules, Portal};
