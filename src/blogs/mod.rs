//! Blog resource.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → handlers.rs (extract id/body)
//!     → types.rs (presence check on create, merge on update)
//!     → upstream client
//!     → {blog}/{blogs} envelope or ApiError
//! ```

pub mod handlers;
pub mod types;

use axum::{routing::get, Router};

use crate::http::server::AppState;
use self::handlers::*;

/// Routes for `/blogs` and `/blogs/{id}`.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_blogs).post(create_blog))
        .route(
            "/blogs/{id}",
            get(get_blog).put(update_blog).delete(delete_blog),
        )
}
