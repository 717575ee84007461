//! CORS preflight middleware.
//!
//! `OPTIONS` requests to any path are answered here with 204 and the
//! configured CORS headers; they never reach a route. Other requests pass
//! through unmodified unless `attach_to_responses` is enabled, in which
//! case their responses also carry `Access-Control-Allow-Origin: *`.

use axum::{
    extract::{Request, State},
    http::{header, header::InvalidHeaderValue, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;

/// Pre-rendered CORS header values.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
    max_age: HeaderValue,
    attach_to_responses: bool,
}

impl CorsHeaders {
    pub fn from_config(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            allow_methods: HeaderValue::from_str(&config.allow_methods)?,
            allow_headers: HeaderValue::from_str(&config.allow_headers)?,
            max_age: HeaderValue::from(config.max_age_secs),
            attach_to_responses: config.attach_to_responses,
        })
    }
}

pub async fn cors_middleware(
    State(cors): State<CorsHeaders>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, cors.allow_methods);
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, cors.allow_headers);
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, cors.max_age);
        return response;
    }

    let mut response = next.run(request).await;
    if cors.attach_to_responses {
        response
            .headers_mut()
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
    response
}
