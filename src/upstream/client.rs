//! HTTP client for the upstream document store.
//!
//! # Responsibilities
//! - Build `blogs` resource URLs below the configured base URL
//! - Issue one request per operation, bounded by the configured timeouts
//! - Turn non-success statuses into `UpstreamError::Status`
//! - Decode success bodies as opaque JSON

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::types::{UpstreamError, UpstreamResult};

const BLOGS: &str = "blogs";

/// Client for the document store's `blogs` resource.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: Client,
    base_url: Url,
}

impl UpstreamClient {
    /// Create a new client from configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .no_proxy()
            .build()
            .map_err(UpstreamError::Transport)?;

        tracing::info!(base_url = %base_url, "Upstream client initialized");

        Ok(Self { http, base_url })
    }

    /// The store's base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /blogs`
    pub async fn list_blogs(&self) -> UpstreamResult<Value> {
        let request = self.http.get(self.blogs_url(None));
        let response = self.send("list", request).await?;
        Ok(response.json().await?)
    }

    /// `GET /blogs/{id}`
    pub async fn get_blog(&self, id: &str) -> UpstreamResult<Value> {
        let request = self.http.get(self.blogs_url(Some(id)));
        let response = self.send("get", request).await?;
        Ok(response.json().await?)
    }

    /// `POST /blogs`
    pub async fn create_blog(&self, document: &Value) -> UpstreamResult<Value> {
        let request = self.http.post(self.blogs_url(None)).json(document);
        let response = self.send("create", request).await?;
        Ok(response.json().await?)
    }

    /// `PUT /blogs/{id}`
    pub async fn update_blog(&self, id: &str, document: &Value) -> UpstreamResult<Value> {
        let request = self.http.put(self.blogs_url(Some(id))).json(document);
        let response = self.send("update", request).await?;
        Ok(response.json().await?)
    }

    /// `DELETE /blogs/{id}`
    ///
    /// The response body, if any, is discarded.
    pub async fn delete_blog(&self, id: &str) -> UpstreamResult<()> {
        let request = self.http.delete(self.blogs_url(Some(id)));
        self.send("delete", request).await?;
        Ok(())
    }

    /// Resource URL for the collection, or for one document when `id` is set.
    /// The id is percent-encoded as a single path segment.
    fn blogs_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(BLOGS);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> UpstreamResult<Response> {
        let result = request.send().await;

        let outcome = match &result {
            Ok(response) if response.status().is_success() => "success",
            Ok(_) => "error_status",
            Err(e) if e.is_timeout() => "timeout",
            Err(_) => "transport_error",
        };
        metrics::record_upstream(operation, outcome);

        let response = result?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                operation,
                status = status.as_u16(),
                url = %response.url(),
                "Upstream returned non-success status"
            );
            return Err(UpstreamError::Status(status));
        }

        Ok(response)
    }
}
