//! Response envelopes.
//!
//! Success bodies wrap the store's JSON untouched under `blog` or `blogs`.
//! Status-only bodies (health, errors) are `{status, message}`.

use serde::Serialize;
use serde_json::Value;

/// `{"status": "success" | "error", "message": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct StatusEnvelope {
    pub status: &'static str,
    pub message: String,
}

impl StatusEnvelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// `{"blog": <document>}`
#[derive(Debug, Clone, Serialize)]
pub struct BlogEnvelope {
    pub blog: Value,
}

/// `{"blogs": <collection>}`
#[derive(Debug, Clone, Serialize)]
pub struct BlogsEnvelope {
    pub blogs: Value,
}
