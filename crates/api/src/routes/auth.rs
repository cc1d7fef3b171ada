//! Admin login and logout.

use axum::{extract::State, http::StatusCode, Extension, Json};
use domain::models::auth::{LoginRequest, LoginResponse};
use persistence::repositories::SessionRepository;
use shared::crypto::sha256_hex;
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::config::AdminConfig;
use crate::error::ApiError;
use crate::middleware::metrics::record_login_attempt;
use crate::middleware::AdminToken;

/// Compares against the configured credentials by digest, so the comparison
/// never short-circuits on the first differing byte of the secret.
fn credentials_match(config: &AdminConfig, username: &str, password: &str) -> bool {
    let user_ok = sha256_hex(username) == sha256_hex(&config.username);
    let pass_ok = sha256_hex(password) == sha256_hex(&config.password);
    user_ok & pass_ok
}

/// Open an admin session.
///
/// POST /api/v1/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    if !credentials_match(&state.config.admin, &request.username, &request.password) {
        record_login_attempt(false);
        warn!(username = %request.username, "Admin login rejected");
        return Err(ApiError::Unauthorized("Usuário ou senha incorretos.".into()));
    }

    let ttl = chrono::Duration::seconds(state.config.admin.session_ttl_secs);
    let (token, session) = SessionRepository::new(state.store.clone())
        .create(&request.username, ttl)
        .await;

    record_login_attempt(true);
    info!(username = %session.username, expires_at = %session.expires_at, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        expires_at: session.expires_at,
    }))
}

/// Close the current admin session.
///
/// POST /api/v1/admin/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(AdminToken(token)): Extension<AdminToken>,
) -> StatusCode {
    if SessionRepository::new(state.store.clone()).revoke(&token).await {
        info!("Admin logged out");
    }
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminConfig {
        AdminConfig {
            username: "admin".into(),
            password: "admin123".into(),
            session_ttl_secs: 60,
        }
    }

    #[test]
    fn test_credentials_match() {
        assert!(credentials_match(&admin(), "admin", "admin123"));
        assert!(!credentials_match(&admin(), "admin", "admin1234"));
        assert!(!credentials_match(&admin(), "Admin", "admin123"));
        assert!(!credentials_match(&admin(), "", ""));
    }
}
