//! Blog API proxy library.
//!
//! Exposes a REST API for blogs and forwards every call to an upstream JSON
//! document store, wrapping its answers in `{blog}`/`{blogs}` envelopes and
//! its failures in `{status: "error", message}`.

pub mod blogs;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
