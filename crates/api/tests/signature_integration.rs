//! Integration tests for the signer flow.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, get_request, json_request, parse_response_body, response_text, sign_body,
    stroke_events, PENDING_CPF, SIGNED_CPF,
};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_get_order_by_cpf_in_any_format() {
    let app = create_test_app();

    for cpf in ["12345678900", PENDING_CPF] {
        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/v1/signature/{}", cpf)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_response_body(response).await;
        assert_eq!(body["numero"], "0001");
        assert_eq!(body["status"], "pendente");
    }
}

#[tokio::test]
async fn test_unknown_cpf_has_no_order() {
    let app = create_test_app();

    let response = app
        .oneshot(get_request("/api/v1/signature/00000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sign_pending_order() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            sign_body(stroke_events()),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let order = parse_response_body(response).await;
    assert_eq!(order["status"], "assinada");
    assert_eq!(order["signature"]["assinatura"], "João Silva");
    assert!(order["signature"]["dataAssinatura"].is_string());
    assert!(order["signature"]["assinaturaImagem"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    // Exactly once
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            sign_body(stroke_events()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        parse_response_body(response).await["error"],
        "order_already_signed"
    );

    let response = app
        .oneshot(get_request("/api/v1/signature/12345678900/document"))
        .await
        .unwrap();
    let html = response_text(response).await;
    assert!(html.contains("DOCUMENTO ASSINADO DIGITALMENTE"));
    assert!(html.contains("class=\"signature-image\""));
}

#[tokio::test]
async fn test_sign_with_explicit_signer_name() {
    let app = create_test_app();

    let mut body = sign_body(stroke_events());
    body["signer"] = json!("J. Silva");
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let order = parse_response_body(response).await;
    assert_eq!(order["signature"]["assinatura"], "J. Silva");
}

#[tokio::test]
async fn test_sign_requires_read_confirmation() {
    let app = create_test_app();

    let mut body = sign_body(stroke_events());
    body["confirmRead"] = json!(false);
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            body,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_response_body(response).await["error"],
        "read_not_confirmed"
    );

    let response = app
        .oneshot(get_request("/api/v1/signature/12345678900"))
        .await
        .unwrap();
    assert_eq!(parse_response_body(response).await["status"], "pendente");
}

#[tokio::test]
async fn test_sign_requires_drawing() {
    let app = create_test_app();

    // Pointer down and up without movement draws nothing
    let events = json!([
        { "type": "down", "x": 20.0, "y": 50.0 },
        { "type": "up" }
    ]);
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            sign_body(events),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        parse_response_body(response).await["error"],
        "signature_missing"
    );

    // A stroke followed by clear leaves the canvas empty
    let mut events = stroke_events();
    events.as_array_mut().unwrap().push(json!({ "type": "clear" }));
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            sign_body(events),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_on_embedded_pad() {
    let app = create_test_app();

    let body = json!({
        "confirmRead": true,
        "surface": { "displayWidth": 200.0, "displayHeight": 75.0, "embedded": true },
        "events": [
            { "type": "down", "x": 10.0, "y": 10.0 },
            { "type": "move", "x": 60.0, "y": 40.0 },
            { "type": "leave" }
        ]
    });
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            body,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sign_with_long_recorded_stroke() {
    let app = create_test_app();

    let mut events = vec![json!({ "type": "down", "x": 10.0, "y": 100.0 })];
    for i in 0..5000 {
        let x = 10.0 + (i % 380) as f64;
        let y = 60.0 + (i % 80) as f64;
        events.push(json!({ "type": "move", "x": x, "y": y }));
    }
    events.push(json!({ "type": "up" }));

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/signature/12345678900/sign",
            sign_body(json!(events)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let order = parse_response_body(response).await;
    assert_eq!(order["status"], "assinada");
}

#[tokio::test]
async fn test_signed_order_shown_for_review() {
    let app = create_test_app();

    let response = app
        .oneshot(get_request(&format!("/api/v1/signature/{}", SIGNED_CPF)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "assinada");
    assert_eq!(body["signature"]["assinatura"], "Maria Santos");
}
