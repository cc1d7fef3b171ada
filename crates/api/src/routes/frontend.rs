//! Static frontend file serving.
//!
//! Serves the built single-page app from `frontend.static_dir`. Paths without
//! a file extension fall back to `index.html` so client-side routes such as
//! `/signature/123.456.789-00` resolve.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::app::AppState;
use crate::config::FrontendConfig;

/// Serve static files with SPA fallback.
pub async fn serve_frontend(State(state): State<AppState>, uri: Uri) -> Response {
    let config = &state.config.frontend;
    let base_dir = PathBuf::from(&config.static_dir);

    if !base_dir.exists() {
        warn!(dir = %base_dir.display(), "Frontend directory does not exist");
        return (StatusCode::SERVICE_UNAVAILABLE, "Frontend not available").into_response();
    }

    let path = uri.path().trim_start_matches('/');
    let file_path = if path.is_empty() {
        base_dir.join("index.html")
    } else {
        base_dir.join(path)
    };

    if !is_safe_path(&base_dir, &file_path) {
        warn!(requested_path = %file_path.display(), "Path traversal attempt detected");
        return StatusCode::FORBIDDEN.into_response();
    }

    if let Ok(response) = serve_file(&file_path, config).await {
        return response;
    }

    if !path.contains('.') {
        if let Ok(response) = serve_file(&base_dir.join("index.html"), config).await {
            return response;
        }
    }

    StatusCode::NOT_FOUND.into_response()
}

async fn serve_file(path: &Path, config: &FrontendConfig) -> Result<Response, std::io::Error> {
    let content = fs::read(path).await?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    let cache_control = if is_immutable_asset(path) {
        format!("public, max-age={}, immutable", config.immutable_cache_max_age)
    } else {
        format!("public, max-age={}", config.mutable_cache_max_age)
    };

    let mut response = Body::from(content).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }
    Ok(response)
}

/// Check if path is within base directory.
fn is_safe_path(base: &Path, path: &Path) -> bool {
    if path.exists() {
        match (base.canonicalize(), path.canonicalize()) {
            (Ok(canonical_base), Ok(canonical_path)) => canonical_path.starts_with(canonical_base),
            _ => false,
        }
    } else {
        normalize_path(path).starts_with(normalize_path(base))
    }
}

/// Normalize a path by removing `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir => {}
            component => result.push(component),
        }
    }
    result
}

/// Bundler output under `assets/` carries a content hash in its file name.
fn is_immutable_asset(path: &Path) -> bool {
    path.components()
        .any(|c| c.as_os_str() == "assets")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_immutable_asset() {
        assert!(is_immutable_asset(Path::new("frontend/dist/assets/index-4f1c2a.js")));
        assert!(!is_immutable_asset(Path::new("frontend/dist/index.html")));
        assert!(!is_immutable_asset(Path::new("frontend/dist/favicon.ico")));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/srv/frontend/../other")),
            PathBuf::from("/srv/other")
        );
        assert_eq!(
            normalize_path(Path::new("/srv/./frontend")),
            PathBuf::from("/srv/frontend")
        );
    }

    #[test]
    fn test_is_safe_path() {
        let base = Path::new("/srv/frontend");
        assert!(is_safe_path(base, Path::new("/srv/frontend/signature/index.html")));
        assert!(!is_safe_path(base, Path::new("/srv/frontend/../etc/passwd")));
    }
}
