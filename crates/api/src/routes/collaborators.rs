//! Collaborator directory endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use domain::models::collaborator::{ListCollaboratorsQuery, ListCollaboratorsResponse};
use domain::models::Collaborator;
use domain::services::CollaboratorFilter;
use domain::DomainError;
use persistence::repositories::CollaboratorRepository;
use shared::pagination::{page_links, PageRequest};

use crate::app::AppState;
use crate::error::ApiError;

/// Search the directory.
///
/// The response carries the distinct roles for the role filter dropdown.
///
/// GET /api/v1/collaborators
pub async fn search_collaborators(
    State(state): State<AppState>,
    Query(query): Query<ListCollaboratorsQuery>,
) -> Json<ListCollaboratorsResponse> {
    let repo = CollaboratorRepository::new(state.store.clone());
    let filter = CollaboratorFilter::from(&query);
    let page = repo
        .search(&filter, PageRequest::new(query.page, query.per_page))
        .await;

    let links = page_links(page.pagination.page, page.pagination.total_pages);
    Json(ListCollaboratorsResponse {
        data: page.data,
        pagination: page.pagination,
        links,
        roles: repo.roles().await,
    })
}

/// Look up a collaborator by CPF, formatted or digits only.
///
/// GET /api/v1/collaborators/:cpf
pub async fn get_collaborator(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Json<Collaborator>, ApiError> {
    CollaboratorRepository::new(state.store.clone())
        .find_by_cpf(&cpf)
        .await
        .map(Json)
        .ok_or_else(|| DomainError::NotFound("Collaborator").into())
}
