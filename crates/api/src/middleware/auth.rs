//! Admin session middleware.
//!
//! Admin routes require `Authorization: Bearer <token>` carrying a token
//! issued by the login endpoint.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use persistence::repositories::SessionRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// The bearer token of an authenticated request, for handlers such as logout.
#[derive(Debug, Clone)]
pub struct AdminToken(pub String);

/// Extracts a bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware for admin-only routes.
///
/// The resolved session and token are stored in request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = match bearer_token(req.headers()) {
        Some(token) => token.to_string(),
        None => {
            return ApiError::Unauthorized("Missing admin session token".into()).into_response();
        }
    };

    match SessionRepository::new(state.store.clone())
        .validate(&token)
        .await
    {
        Some(session) => {
            tracing::debug!(username = %session.username, "Admin request authenticated");
            req.extensions_mut().insert(session);
            req.extensions_mut().insert(AdminToken(token));
            next.run(req).await
        }
        None => ApiError::Unauthorized("Invalid or expired admin session".into()).into_response(),
    }
}
