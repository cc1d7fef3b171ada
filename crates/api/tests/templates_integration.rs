//! Integration tests for template management endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_app, delete_request_with_auth, get_request_with_auth, json_request_with_auth,
    login, parse_response_body,
};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_list_templates_by_unit() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(get_request_with_auth(
            "/api/v1/templates?filial=Rio%20Centro",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["nome"], "Modelo Padrão - Rio Centro");

    let response = app
        .oneshot(get_request_with_auth("/api/v1/templates?filial=Tijuca", &token))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_default_fields() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .oneshot(get_request_with_auth("/api/v1/templates/defaults", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "obrigacoes",
            "proibicoes",
            "penalidades",
            "termoRecebimento",
            "procedimentosAcidente"
        ]
    );
}

#[tokio::test]
async fn test_template_crud() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/templates",
            json!({ "filial": "Méier", "nome": "Modelo Méier" }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = parse_response_body(response).await;
    assert_eq!(created["fields"].as_array().unwrap().len(), 5);
    let id = created["id"].as_str().unwrap().to_string();

    let new_name = format!("Modelo {}", CompanyName().fake::<String>());
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/templates/{}", id),
            json!({
                "nome": new_name,
                "fields": [{ "id": "epis", "label": "EPIs", "content": "Luvas" }]
            }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = parse_response_body(response).await;
    assert_eq!(updated["nome"], new_name.as_str());
    assert_eq!(updated["filial"], "Méier");
    assert_eq!(updated["fields"][0]["content"], "Luvas");
    assert_eq!(updated["fields"][0]["active"], true);

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/templates/{}", id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request_with_auth(
            &format!("/api/v1/templates/{}", id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_template_rejects_unknown_unit() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/templates",
            json!({ "filial": "Niterói", "nome": "Modelo" }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_response_body(response).await["error"], "unknown_unit");
}

#[tokio::test]
async fn test_create_template_rejects_duplicate_field_ids() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/templates",
            json!({
                "filial": "Tijuca",
                "nome": "Modelo",
                "fields": [
                    { "id": "riscos", "label": "Riscos" },
                    { "id": "riscos", "label": "Riscos de novo" }
                ]
            }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "fields");
}

#[tokio::test]
async fn test_create_template_rejects_disabled_required_field() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/templates",
            json!({
                "filial": "Tijuca",
                "nome": "Modelo",
                "fields": [{ "id": "empresa", "label": "Empresa", "active": false }]
            }),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "fields");
}

#[tokio::test]
async fn test_template_changes_do_not_touch_existing_orders() {
    let app = create_test_app();
    let token = login(&app).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/templates",
            json!({
                "filial": "Tijuca",
                "nome": "Modelo",
                "fields": [{ "id": "riscos", "label": "Riscos", "content": "Poeira" }]
            }),
            &token,
        ))
        .await
        .unwrap();
    let template_id = parse_response_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let mut body = common::order_body("55555555555");
    body["templateId"] = json!(template_id);
    let response = app
        .clone()
        .oneshot(json_request_with_auth(Method::POST, "/api/v1/orders", body, &token))
        .await
        .unwrap();
    let order_id = parse_response_body(response).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    app.clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/templates/{}", template_id),
            &token,
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request_with_auth(
            &format!("/api/v1/orders/{}", order_id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(parse_response_body(response).await["riscos"], "Poeira");
}
