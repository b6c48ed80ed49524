//! Resilience helpers.
//!
//! # Where retries happen
//! ```text
//! startup:        chain::connect   fixed delay, bounded attempts
//! receipt wait:   chain::transaction  backoff.rs, bounded by deadline
//! everything else: no retries, failures surface to the caller
//! ```

pub mod backoff;
