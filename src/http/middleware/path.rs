//! Path normalization applied before routing.
//!
//! Route matching is lenient about the resource name: `/BLOGS/7` routes like
//! `/blogs/7`. Only the leading `blogs` segment is folded; ids keep their
//! case. Trailing slashes are trimmed by `NormalizePathLayer` in the server.

use axum::{extract::Request, http::Uri};

const RESOURCE: &str = "blogs";

/// Fold the case of a leading `blogs` segment.
pub async fn fold_resource_case(mut request: Request) -> Request {
    if let Some(uri) = folded_uri(request.uri()) {
        *request.uri_mut() = uri;
    }
    request
}

/// The URI with its first segment lower-cased, if that segment is a
/// differently-cased `blogs`.
fn folded_uri(uri: &Uri) -> Option<Uri> {
    let rest = uri.path().strip_prefix('/')?;
    let (first, tail) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
    if first == RESOURCE || !first.eq_ignore_ascii_case(RESOURCE) {
        return None;
    }

    let mut path_and_query = format!("/{RESOURCE}{tail}");
    if let Some(query) = uri.query() {
        path_and_query.push('?');
        path_and_query.push_str(query);
    }

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse().ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(uri: &str) -> Option<String> {
        folded_uri(&uri.parse().unwrap()).map(|u| u.to_string())
    }

    #[test]
    fn test_folds_resource_segment_only() {
        assert_eq!(fold("/BLOGS").as_deref(), Some("/blogs"));
        assert_eq!(fold("/Blogs/AbC").as_deref(), Some("/blogs/AbC"));
        assert_eq!(fold("/bLoGs/7?x=Y").as_deref(), Some("/blogs/7?x=Y"));
    }

    #[test]
    fn test_leaves_other_paths_alone() {
        assert_eq!(fold("/blogs/AbC"), None);
        assert_eq!(fold("/"), None);
        assert_eq!(fold("/BLOGSX"), None);
        assert_eq!(fold("/posts/BLOGS"), None);
    }
}
