//! HTTP presentation layer.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (middleware: request ID, trace, timeout, body limit)
//!     → request.rs (JSON body → raw caller strings)
//!     → portal (validation, chain calls)
//!     → response.rs (envelope, status from error kind)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use response::{ApiError, Envelope, ErrorBody};
pub use server::{build_router, AppState, HttpServer};
