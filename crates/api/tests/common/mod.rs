//! Common test utilities for integration tests.
//!
//! Every test builds its own router over a freshly seeded in-memory store, so
//! tests never share state.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use ordens_servico_api::{
    app::create_app,
    config::{
        AdminConfig, Config, DocumentsConfig, FrontendConfig, LoggingConfig, SecurityConfig,
        ServerConfig, SignatureConfig, StoreConfig,
    },
};
use persistence::seed::DEFAULT_UNITS;
use persistence::Store;
use serde_json::json;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// CPF of the seeded pending order (0001).
pub const PENDING_CPF: &str = "123.456.789-00";
/// CPF of the seeded signed order (0002).
pub const SIGNED_CPF: &str = "987.654.321-00";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
            max_body_size: 2 * 1024 * 1024,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            hsts_enabled: false,
        },
        admin: AdminConfig {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            session_ttl_secs: 3600,
        },
        documents: DocumentsConfig {
            public_base_url: "https://os.example.com/".to_string(),
            qr_size: 200,
            qr_quiet_zone: true,
        },
        signature: SignatureConfig {
            width: 400,
            height: 200,
            embedded_height: 150,
            stroke_width: 2.0,
        },
        store: StoreConfig {
            seed: true,
            units: units(),
        },
        frontend: FrontendConfig::default(),
    }
}

pub fn units() -> Vec<String> {
    DEFAULT_UNITS.iter().map(|u| u.to_string()).collect()
}

/// Router over the demo data.
pub fn create_test_app() -> Router {
    create_app(test_config(), Store::seeded(units()))
}

/// Router over an empty store.
pub fn create_empty_app() -> Router {
    create_app(test_config(), Store::new(units()))
}

pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

pub async fn response_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn response_text(response: axum::response::Response) -> String {
    String::from_utf8(response_bytes(response).await).unwrap()
}

/// Logs in with the configured credentials and returns the session token.
pub async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/admin/login",
            json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_response_body(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// A complete order body for a CPF with no directory entry.
pub fn order_body(cpf: &str) -> serde_json::Value {
    json!({
        "empresa": "Empresa Teste Ltda",
        "filial": "Tijuca",
        "colaborador": "Fulano de Tal",
        "cpf": cpf,
        "funcao": "Almoxarife",
        "riscos": "Ruído",
        "epis": "Protetor auricular",
        "dataEmissao": "2024-06-10"
    })
}

/// Pointer events drawing a single horizontal stroke.
pub fn stroke_events() -> serde_json::Value {
    json!([
        { "type": "down", "x": 20.0, "y": 50.0 },
        { "type": "move", "x": 120.0, "y": 60.0 },
        { "type": "move", "x": 220.0, "y": 55.0 },
        { "type": "up" }
    ])
}

pub fn sign_body(events: serde_json::Value) -> serde_json::Value {
    json!({
        "confirmRead": true,
        "surface": { "displayWidth": 400.0, "displayHeight": 200.0 },
        "events": events
    })
}
