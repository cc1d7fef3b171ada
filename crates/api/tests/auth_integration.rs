//! Integration tests for admin login and session handling.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, get_request, get_request_with_auth, json_request, json_request_with_auth,
    login, parse_response_body,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_login_returns_session_token() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/admin/login",
            json!({ "username": "admin", "password": "admin123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert!(body["token"].as_str().unwrap().starts_with("os_"));
    assert!(body["expiresAt"].is_string());
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/admin/login",
            json!({ "username": "admin", "password": "wrong" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Usuário ou senha incorretos.");
}

#[tokio::test]
async fn test_login_validates_body() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/admin/login",
            json!({ "username": "", "password": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/orders"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(get_request_with_auth("/api/v1/orders", "os_not_a_session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth("/api/v1/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/admin/logout",
            json!({}),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request_with_auth("/api/v1/dashboard", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signer_routes_are_public() {
    let app = create_test_app();

    let response = app
        .oneshot(get_request("/api/v1/signature/12345678900"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
