//! Request outcome reporting.
//!
//! `report_errors` is the terminal stage for failures: any response carrying
//! an [`ErrorReport`] is logged with method, path, status, message and the
//! location the error was raised at. `track_metrics` records per-route
//! request counts and latency.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::http::error::ErrorReport;
use crate::http::request::RequestIdExt;
use crate::observability::metrics;

pub async fn report_errors(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request.request_id().unwrap_or("unknown").to_string();

    let response = next.run(request).await;

    if let Some(report) = response.extensions().get::<ErrorReport>() {
        let status = response.status().as_u16();
        if response.status().is_server_error() {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                origin = %report.origin,
                cause = report.cause.as_deref().unwrap_or("N/A"),
                "{}",
                report.message
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status,
                origin = %report.origin,
                "{}",
                report.message
            );
        }
    }

    response
}

/// Must be installed with `route_layer` so the matched route is known.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, &route, response.status().as_u16(), start);
    response
}
