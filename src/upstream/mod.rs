//! Upstream document store subsystem.
//!
//! # Data Flow
//! ```text
//! blog handler
//!     → client.rs (build URL, send, check status)
//!     → document store (GET/POST/PUT/DELETE /blogs[/{id}])
//!     → opaque JSON document or UpstreamError
//! ```
//!
//! No retries. One call per operation; the only bound is the configured
//! timeout.

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{UpstreamError, UpstreamResult};
