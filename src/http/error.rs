//! API error type and its JSON envelope.
//!
//! Every failed request ends here. The error resolves to a status code and a
//! client-facing message, is rendered as `{"status":"error","message":...}`,
//! and leaves an [`ErrorReport`] in the response extensions for the
//! reporting middleware to log.

use axum::{
    extract::rejection::{BytesRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::panic::Location;
use thiserror::Error;

use crate::blogs::types::MissingFields;
use crate::http::response::StatusEnvelope;
use crate::upstream::UpstreamError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What went wrong, with the status it maps to.
#[derive(Debug, Error)]
pub enum ApiErrorKind {
    /// 400: unusable client input.
    #[error("{0}")]
    BadRequest(String),

    /// 404: no such resource or route.
    #[error("{0}")]
    NotFound(&'static str),

    /// Upstream answered with a non-success status; passed through verbatim.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    /// 504: upstream did not answer in time.
    #[error("Upstream request timed out")]
    Timeout,

    /// 500: anything else. The cause is logged, never sent to the client.
    #[error("Internal server error")]
    Internal(#[source] BoxError),
}

/// An error raised while handling a request.
///
/// Records the source location it was raised at.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct ApiError {
    kind: ApiErrorKind,
    origin: &'static Location<'static>,
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    #[track_caller]
    pub fn new(kind: ApiErrorKind) -> Self {
        Self {
            kind,
            origin: Location::caller(),
        }
    }

    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::BadRequest(message.into()))
    }

    #[track_caller]
    pub fn not_found(message: &'static str) -> Self {
        Self::new(ApiErrorKind::NotFound(message))
    }

    #[track_caller]
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self::new(ApiErrorKind::Internal(cause.into()))
    }

    pub fn kind(&self) -> &ApiErrorKind {
        &self.kind
    }

    pub fn origin(&self) -> &'static Location<'static> {
        self.origin
    }

    pub fn status(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ApiErrorKind::Upstream { status, .. } => *status,
            ApiErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiErrorKind::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Underlying cause, for internal errors only.
    fn cause(&self) -> Option<String> {
        match &self.kind {
            ApiErrorKind::Internal(cause) => Some(cause.to_string()),
            _ => None,
        }
    }
}

impl From<UpstreamError> for ApiError {
    #[track_caller]
    fn from(err: UpstreamError) -> Self {
        let message = err.to_string();
        match err {
            UpstreamError::Status(status) => Self::new(ApiErrorKind::Upstream { status, message }),
            UpstreamError::Timeout => Self::new(ApiErrorKind::Timeout),
            other => Self::internal(other),
        }
    }
}

impl From<MissingFields> for ApiError {
    #[track_caller]
    fn from(err: MissingFields) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl From<BytesRejection> for ApiError {
    #[track_caller]
    fn from(err: BytesRejection) -> Self {
        Self::internal(err)
    }
}

impl From<PathRejection> for ApiError {
    #[track_caller]
    fn from(err: PathRejection) -> Self {
        Self::internal(err)
    }
}

/// Failure details attached to error responses for logging.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub origin: &'static Location<'static>,
    pub cause: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.message();
        let report = ErrorReport {
            message: message.clone(),
            origin: self.origin,
            cause: self.cause(),
        };

        let mut response = (self.status(), Json(StatusEnvelope::error(message))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
