//! Blog route handlers.
//!
//! Each handler makes one upstream call (two for update) and wraps the
//! store's answer in an envelope. Failures propagate as [`ApiError`].

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::Value;

use crate::blogs::types::{BlogPatch, NewBlog};
use crate::http::error::{ApiError, ApiResult};
use crate::http::request::JsonBody;
use crate::http::response::{BlogEnvelope, BlogsEnvelope};
use crate::http::server::AppState;
use crate::upstream::{UpstreamClient, UpstreamError};

pub const BLOG_NOT_FOUND: &str = "Blog not found";

/// The `{id}` path segment, decoded.
#[derive(Debug, Clone)]
pub struct BlogId(pub String);

impl<S> FromRequestParts<S> for BlogId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}

/// `GET /blogs`
pub async fn list_blogs(State(state): State<AppState>) -> ApiResult<Json<BlogsEnvelope>> {
    let blogs = state.upstream.list_blogs().await?;
    Ok(Json(BlogsEnvelope { blogs }))
}

/// `GET /blogs/{id}`
pub async fn get_blog(
    State(state): State<AppState>,
    BlogId(id): BlogId,
) -> ApiResult<Json<BlogEnvelope>> {
    let blog = fetch_existing(&state.upstream, &id).await?;
    Ok(Json(BlogEnvelope { blog }))
}

/// `POST /blogs`
pub async fn create_blog(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> ApiResult<(StatusCode, Json<BlogEnvelope>)> {
    let new_blog = NewBlog::from_body(&body)?;
    let document = new_blog.into_document(Utc::now());

    let blog = state.upstream.create_blog(&document).await?;
    tracing::debug!(id = ?blog.get("id"), "Blog created");

    Ok((StatusCode::CREATED, Json(BlogEnvelope { blog })))
}

/// `PUT /blogs/{id}`
///
/// Fetch, merge, write back. Nothing is undone if the write fails.
pub async fn update_blog(
    State(state): State<AppState>,
    BlogId(id): BlogId,
    JsonBody(body): JsonBody,
) -> ApiResult<Json<BlogEnvelope>> {
    let patch = BlogPatch::from_body(&body);
    let existing = fetch_existing(&state.upstream, &id).await?;
    let document = patch.apply(existing, Utc::now());

    let blog = state.upstream.update_blog(&id, &document).await?;
    Ok(Json(BlogEnvelope { blog }))
}

/// `DELETE /blogs/{id}`
pub async fn delete_blog(
    State(state): State<AppState>,
    BlogId(id): BlogId,
) -> ApiResult<StatusCode> {
    state.upstream.delete_blog(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Any non-success status from the store reads as "not found".
async fn fetch_existing(upstream: &UpstreamClient, id: &str) -> ApiResult<Value> {
    match upstream.get_blog(id).await {
        Ok(blog) => Ok(blog),
        Err(UpstreamError::Status(status)) => {
            tracing::debug!(id, status = status.as_u16(), "Blog lookup failed");
            Err(ApiError::not_found(BLOG_NOT_FOUND))
        }
        Err(e) => Err(ApiError::from(e)),
    }
}
