//! Signer flow: a collaborator opens their order by CPF, reads it and signs.

use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};
use chrono::Utc;
use domain::models::order::SignOrderRequest;
use domain::models::{OrderSignature, ServiceOrder};
use domain::services::capture_signature;
use domain::DomainError;
use persistence::repositories::OrderRepository;
use shared::cpf::mask_cpf;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_order_signed;
use crate::routes::orders::order_html;
use crate::services::DocumentError;

async fn order_for_cpf(state: &AppState, cpf: &str) -> Result<ServiceOrder, ApiError> {
    OrderRepository::new(state.store.clone())
        .find_by_cpf(cpf)
        .await
        .ok_or_else(|| DomainError::NotFound("Order").into())
}

/// The order a CPF should sign, or its latest signed one.
///
/// GET /api/v1/signature/:cpf
pub async fn get_signer_order(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Json<ServiceOrder>, ApiError> {
    Ok(Json(order_for_cpf(&state, &cpf).await?))
}

/// Printable document for the signer.
///
/// GET /api/v1/signature/:cpf/document
pub async fn get_signer_document(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Html<String>, ApiError> {
    let order = order_for_cpf(&state, &cpf).await?;
    Ok(Html(order_html(&state, &order)?))
}

/// Sign the pending order of a CPF.
///
/// The pointer events recorded by the client are replayed on a server-side
/// canvas on the blocking pool; the resulting bitmap is stored as a PNG data URL.
///
/// POST /api/v1/signature/:cpf/sign
pub async fn sign_order(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
    Json(request): Json<SignOrderRequest>,
) -> Result<Json<ServiceOrder>, ApiError> {
    request.validate()?;

    let order = order_for_cpf(&state, &cpf).await?;
    order.ensure_pending()?;
    if !request.confirm_read {
        return Err(DomainError::ReadNotConfirmed.into());
    }

    let SignOrderRequest {
        signer,
        surface: descriptor,
        events,
        ..
    } = request;
    let surface = state.config.signature_surface(descriptor.embedded);
    let image =
        tokio::task::spawn_blocking(move || capture_signature(surface, &descriptor, &events))
            .await
            .map_err(|e| ApiError::Internal(format!("Signature capture task failed: {}", e)))?
            .map_err(DocumentError::from)?
            .ok_or(DomainError::SignatureMissing)?;

    let signer = signer
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&order.collaborator)
        .to_string();

    let signed = OrderRepository::new(state.store.clone())
        .sign(
            order.id,
            OrderSignature {
                signer,
                signed_at: Utc::now(),
                image: Some(image),
            },
        )
        .await?;

    record_order_signed();
    info!(
        order_id = %signed.id,
        number = %signed.number,
        cpf = %mask_cpf(&signed.cpf),
        "Order signed"
    );

    Ok(Json(signed))
}
