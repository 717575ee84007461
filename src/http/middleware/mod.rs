//! HTTP middleware.

pub mod cors;
pub mod path;
pub mod report;

pub use cors::{cors_middleware, CorsHeaders};
pub use path::fold_resource_case;
pub use report::{report_errors, track_metrics};
