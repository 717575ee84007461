//! Request handling.
//!
//! # Responsibilities
//! - Generate a request id (UUID v4) when the client sent none
//! - Echo the id back on the response
//! - Read inbound JSON bodies the way the blog handlers expect them
//!
//! # Body rules
//! - Only `application/json` bodies are parsed; anything else reads as `{}`
//! - An empty body reads as `{}`, so does a JSON array
//! - Malformed JSON, a top-level scalar or an oversized body is an internal error

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::error::ApiError;

/// Header carrying the request id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer that assigns an `x-request-id` to requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Access to the request id header.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&str>;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }
}

/// A request body read as a JSON object.
#[derive(Debug, Clone, Default)]
pub struct JsonBody(pub Map<String, Value>);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Ok(Self::default());
        }

        let bytes = Bytes::from_request(req, state).await?;
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => Ok(Self(map)),
            Value::Array(_) => Ok(Self::default()),
            _ => Err(ApiError::internal("JSON body must be an object or an array")),
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<JsonBody, ApiError> {
        let mut builder = axum::http::Request::builder().method("POST").uri("/blogs");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        JsonBody::from_request(req, &()).await
    }

    #[tokio::test]
    async fn test_parses_json_object() {
        let JsonBody(map) = extract(Some("application/json; charset=utf-8"), r#"{"title":"A"}"#)
            .await
            .unwrap();
        assert_eq!(map.get("title"), Some(&json!("A")));
    }

    #[tokio::test]
    async fn test_other_content_types_read_as_empty() {
        let JsonBody(map) = extract(Some("text/plain"), r#"{"title":"A"}"#).await.unwrap();
        assert!(map.is_empty());

        let JsonBody(map) = extract(None, r#"{"title":"A"}"#).await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_empty_and_array_bodies() {
        let JsonBody(map) = extract(Some("application/json"), "").await.unwrap();
        assert!(map.is_empty());

        let JsonBody(map) = extract(Some("application/json"), "[1,2]").await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_scalar_body_is_internal() {
        for body in [r#""x""#, "42", "true", "null"] {
            let err = extract(Some("application/json"), body).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR, "{body}");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal() {
        let err = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_request_id_ext() {
        let req = axum::http::Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(())
            .unwrap();
        assert_eq!(req.request_id(), Some("abc-123"));
    }
}
