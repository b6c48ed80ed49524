//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached to every HTTP span
//! - Metrics are recorded at the HTTP boundary, once per operation
//! - Metrics recording is a no-op until an exporter is installed

pub mod logging;
pub mod metrics;
