//! Admin login models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to open an admin session.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, max = 255, message = "Password is required"))]
    pub password: String,
}

/// A freshly opened admin session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let request = LoginRequest {
            username: "admin".into(),
            password: "admin123".into(),
        };
        assert!(request.validate().is_ok());

        let request = LoginRequest {
            username: "".into(),
            password: "admin123".into(),
        };
        assert!(request.validate().is_err());
    }
}
