//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the health check and blog routes
//! - Wire up middleware (request id, tracing, CORS preflight, error reporting)
//! - Normalize paths before routing (trailing slash, resource name case)
//! - Answer unmatched routes with a 404 envelope
//! - Serve until the shutdown signal fires

use axum::{
    extract::DefaultBodyLimit,
    http::header::InvalidHeaderValue,
    middleware,
    routing::get,
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{normalize_path::NormalizePathLayer, trace::TraceLayer};

use crate::blogs::blog_routes;
use crate::config::ProxyConfig;
use crate::http::error::ApiError;
use crate::http::middleware::{
    cors_middleware, fold_resource_case, report_errors, track_metrics, CorsHeaders,
};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::response::StatusEnvelope;
use crate::upstream::{UpstreamClient, UpstreamError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
}

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to create upstream client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Invalid CORS header value: {0}")]
    Cors(#[from] InvalidHeaderValue),
}

/// HTTP server for the blog proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let state = AppState {
            upstream: UpstreamClient::new(&config.upstream)?,
        };
        let cors = CorsHeaders::from_config(&config.cors)?;

        let router = Self::build_router(&config, state, cors);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: the request id is assigned before tracing
    /// starts, and preflight requests are answered before any route runs.
    ///
    /// Layers on a `Router` run after route matching, so path normalization
    /// wraps the finished router as the fallback of an outer one.
    fn build_router(config: &ProxyConfig, state: AppState, cors: CorsHeaders) -> Router {
        let routes = Router::new()
            .route("/", get(health))
            .merge(blog_routes())
            .route_layer(middleware::from_fn(track_metrics))
            .fallback(resource_not_found)
            .method_not_allowed_fallback(resource_not_found)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(middleware::from_fn(report_errors))
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer());

        Router::new()
            .fallback_service(routes)
            .layer(middleware::map_request(fold_resource_case))
            .layer(NormalizePathLayer::trim_trailing_slash())
    }

    /// The router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /`
async fn health() -> Json<StatusEnvelope> {
    Json(StatusEnvelope::success("Server is running"))
}

async fn resource_not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn router() -> Router {
        HttpServer::new(ProxyConfig::default()).unwrap().router()
    }

    async fn send(method: Method, uri: &str) -> (StatusCode, Value) {
        let response = router()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "success", "message": "Server is running"}));
    }

    #[tokio::test]
    async fn test_unknown_path_is_404_envelope() {
        let (status, body) = send(Method::GET, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"status": "error", "message": "Resource not found"}));
    }

    #[tokio::test]
    async fn test_unregistered_method_is_404_envelope() {
        let (status, body) = send(Method::PATCH, "/blogs/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Resource not found");

        let (status, _) = send(Method::DELETE, "/blogs").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_lenient_resource_paths() {
        let (status, body) = send(Method::DELETE, "/BLOGS/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Resource not found");

        let (status, body) = send(Method::POST, "/Blogs/").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "All fields are required (title, content, author)");
    }

    #[tokio::test]
    async fn test_preflight_on_any_path() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/blogs/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("x-request-id", "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-7");

        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_before_upstream() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/blogs")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"A","content":"B"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            body,
            json!({
                "status": "error",
                "message": "All fields are required (title, content, author)"
            })
        );
    }
}
