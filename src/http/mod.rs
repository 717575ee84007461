//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request id, JSON body extraction)
//!     → middleware/cors.rs (OPTIONS answered here)
//!     → blog handlers / health / 404 fallback
//!     → response.rs (envelopes) or error.rs (error envelope)
//!     → middleware/report.rs (failure logging)
//!     → Send to client
//! ```

pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use request::{JsonBody, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
