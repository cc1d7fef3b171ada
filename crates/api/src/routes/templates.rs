//! Order template endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::template::{
    CreateTemplateRequest, ListTemplatesQuery, ListTemplatesResponse, UpdateTemplateRequest,
};
use domain::models::{default_fields, OrderTemplate, TemplateField};
use domain::DomainError;
use persistence::repositories::TemplateRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// List templates, optionally for one unit.
///
/// GET /api/v1/templates
pub async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<ListTemplatesQuery>,
) -> Json<ListTemplatesResponse> {
    let unit = query
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());
    let data = TemplateRepository::new(state.store.clone())
        .list(unit)
        .await;
    Json(ListTemplatesResponse { data })
}

/// Field set offered when starting a new template.
///
/// GET /api/v1/templates/defaults
pub async fn default_template_fields() -> Json<Vec<TemplateField>> {
    Json(default_fields())
}

/// Create a template.
///
/// POST /api/v1/templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<OrderTemplate>), ApiError> {
    request.validate()?;

    let template = TemplateRepository::new(state.store.clone())
        .create(request.unit, request.name, request.fields)
        .await?;

    info!(
        template_id = %template.id,
        unit = %template.unit,
        fields = template.fields.len(),
        "Template created"
    );
    Ok((StatusCode::CREATED, Json(template)))
}

/// Get a template by ID.
///
/// GET /api/v1/templates/:template_id
pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<OrderTemplate>, ApiError> {
    TemplateRepository::new(state.store.clone())
        .find_by_id(template_id)
        .await
        .map(Json)
        .ok_or_else(|| DomainError::NotFound("Template").into())
}

/// Update a template.
///
/// PUT /api/v1/templates/:template_id
pub async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<OrderTemplate>, ApiError> {
    request.validate()?;

    let template = TemplateRepository::new(state.store.clone())
        .update(template_id, request)
        .await?;

    info!(template_id = %template.id, "Template updated");
    Ok(Json(template))
}

/// Delete a template. Orders authored from it keep their content.
///
/// DELETE /api/v1/templates/:template_id
pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let template = TemplateRepository::new(state.store.clone())
        .delete(template_id)
        .await?;

    info!(template_id = %template.id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}
