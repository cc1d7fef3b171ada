//! Service order endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use domain::models::order::{
    BulkCreateOrdersRequest, BulkCreateOrdersResponse, BulkSkippedOrder, ListOrdersQuery,
    ListOrdersResponse, OrderFormRequest,
};
use domain::models::{OrderDraft, OrderTemplate, ServiceOrder};
use domain::services::{resolve_order_form, FieldState, FormResolutionInput, OrderFilter, OrderForm};
use domain::DomainError;
use persistence::repositories::{CollaboratorRepository, OrderRepository, TemplateRepository};
use serde::Serialize;
use shared::cpf::{format_cpf, mask_cpf};
use shared::pagination::{page_links, PageRequest};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{
    record_document_rendered, record_order_deleted, record_orders_created,
};
use crate::services::{
    render_order_html, render_order_pdf, render_qr, render_qr_data_url, render_qr_png,
    signature_url,
};

/// Live view of an order form: resolved values plus per-field state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPreviewResponse {
    pub values: OrderDraft,
    pub fields: Vec<FieldState>,
}

async fn load_template(
    state: &AppState,
    id: Option<Uuid>,
) -> Result<Option<OrderTemplate>, ApiError> {
    match id {
        Some(id) => TemplateRepository::new(state.store.clone())
            .find_by_id(id)
            .await
            .map(Some)
            .ok_or_else(|| DomainError::NotFound("Template").into()),
        None => Ok(None),
    }
}

/// Applies the collaborator match and the template to a submitted draft.
async fn resolve_draft(
    state: &AppState,
    draft: OrderDraft,
    template_id: Option<Uuid>,
) -> Result<OrderDraft, ApiError> {
    let template = load_template(state, template_id).await?;
    let collaborator = CollaboratorRepository::new(state.store.clone())
        .find_by_cpf(&draft.cpf)
        .await;

    let mut form = OrderForm::new(draft);
    form.set_collaborator(collaborator);
    form.select_template(template);
    Ok(form.into_values())
}

async fn find_order(state: &AppState, id: Uuid) -> Result<ServiceOrder, ApiError> {
    OrderRepository::new(state.store.clone())
        .find_by_id(id)
        .await
        .ok_or_else(|| DomainError::NotFound("Order").into())
}

/// List orders with filters and pagination.
///
/// GET /api/v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Json<ListOrdersResponse> {
    let filter = OrderFilter::from(&query);
    let page = OrderRepository::new(state.store.clone())
        .list(&filter, PageRequest::new(query.page, query.per_page))
        .await;

    let links = page_links(page.pagination.page, page.pagination.total_pages);
    Json(ListOrdersResponse {
        data: page.data,
        pagination: page.pagination,
        links,
    })
}

/// Create a pending order.
///
/// POST /api/v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<OrderFormRequest>,
) -> Result<(StatusCode, Json<ServiceOrder>), ApiError> {
    request.validate()?;

    let draft = resolve_draft(&state, request.draft, request.template_id).await?;
    let order = OrderRepository::new(state.store.clone())
        .create_pending(draft)
        .await?;

    record_orders_created("single", 1);
    info!(
        order_id = %order.id,
        number = %order.number,
        cpf = %mask_cpf(&order.cpf),
        "Order created"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// Create pending orders for several collaborators sharing the same content.
///
/// Identity fields come from the directory. CPFs without a directory entry or
/// with an order already pending are reported as skipped.
///
/// POST /api/v1/orders/bulk
pub async fn bulk_create_orders(
    State(state): State<AppState>,
    Json(request): Json<BulkCreateOrdersRequest>,
) -> Result<(StatusCode, Json<BulkCreateOrdersResponse>), ApiError> {
    request.validate()?;

    let template = load_template(&state, request.template_id).await?;
    let collaborators = CollaboratorRepository::new(state.store.clone());
    let orders = OrderRepository::new(state.store.clone());

    let mut created = Vec::new();
    let mut skipped = Vec::new();

    for cpf in &request.cpfs {
        let Some(collaborator) = collaborators.find_by_cpf(cpf).await else {
            skipped.push(BulkSkippedOrder {
                cpf: format_cpf(cpf),
                reason: "Colaborador não encontrado.".into(),
            });
            continue;
        };

        let mut form = OrderForm::new(OrderDraft {
            cpf: collaborator.cpf.clone(),
            ..request.shared.clone()
        });
        form.set_collaborator(Some(collaborator));
        form.select_template(template.clone());

        match orders.create_pending(form.into_values()).await {
            Ok(order) => created.push(order),
            Err(err) => {
                warn!(cpf = %mask_cpf(cpf), error = %err, "Bulk order skipped");
                skipped.push(BulkSkippedOrder {
                    cpf: format_cpf(cpf),
                    reason: err.to_string(),
                });
            }
        }
    }

    record_orders_created("bulk", created.len());
    info!(
        created = created.len(),
        skipped = skipped.len(),
        "Bulk order creation finished"
    );

    Ok((
        StatusCode::CREATED,
        Json(BulkCreateOrdersResponse { created, skipped }),
    ))
}

/// Resolve a draft against the directory and a template without saving it.
///
/// POST /api/v1/orders/form
pub async fn preview_order_form(
    State(state): State<AppState>,
    Json(request): Json<OrderFormRequest>,
) -> Result<Json<FormPreviewResponse>, ApiError> {
    let template = load_template(&state, request.template_id).await?;
    let collaborator = CollaboratorRepository::new(state.store.clone())
        .find_by_cpf(&request.draft.cpf)
        .await;

    let input = FormResolutionInput {
        draft: request.draft,
        collaborator,
        template,
    };
    let resolved = resolve_order_form(&input);
    let fields = resolved.field_states(input.template.as_ref());

    Ok(Json(FormPreviewResponse {
        values: resolved.values,
        fields,
    }))
}

/// Get an order by ID.
///
/// GET /api/v1/orders/:order_id
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<ServiceOrder>, ApiError> {
    Ok(Json(find_order(&state, order_id).await?))
}

/// Replace the contents of a pending order.
///
/// PUT /api/v1/orders/:order_id
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<OrderFormRequest>,
) -> Result<Json<ServiceOrder>, ApiError> {
    request.validate()?;

    let draft = resolve_draft(&state, request.draft, request.template_id).await?;
    let order = OrderRepository::new(state.store.clone())
        .update(order_id, draft)
        .await?;

    info!(order_id = %order.id, number = %order.number, "Order updated");
    Ok(Json(order))
}

/// Delete a pending order.
///
/// DELETE /api/v1/orders/:order_id
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let order = OrderRepository::new(state.store.clone())
        .delete(order_id)
        .await?;

    record_order_deleted();
    info!(order_id = %order.id, number = %order.number, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Printable HTML rendering of an order.
pub(crate) fn order_html(state: &AppState, order: &ServiceOrder) -> Result<String, ApiError> {
    let qr = if order.is_signed() {
        let link = signature_url(state.config.public_base_url(), Some(&order.cpf));
        Some(render_qr_data_url(&link, state.config.qr_options())?)
    } else {
        None
    };
    record_document_rendered("html");
    Ok(render_order_html(order, qr.as_deref()))
}

/// Printable document of an order.
///
/// GET /api/v1/orders/:order_id/document
pub async fn order_document(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let order = find_order(&state, order_id).await?;
    Ok(Html(order_html(&state, &order)?))
}

/// PDF export of an order.
///
/// GET /api/v1/orders/:order_id/document.pdf
pub async fn order_document_pdf(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = find_order(&state, order_id).await?;

    let qr = if order.is_signed() {
        let link = signature_url(state.config.public_base_url(), Some(&order.cpf));
        Some(render_qr(&link, state.config.qr_options())?)
    } else {
        None
    };
    let bytes = render_order_pdf(&order, qr.as_ref())?;
    record_document_rendered("pdf");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"ordem-servico-{}.pdf\"", order.number),
            ),
        ],
        bytes,
    ))
}

/// QR code linking to the signing screen of an order's collaborator.
///
/// GET /api/v1/orders/:order_id/qr
pub async fn order_qr(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = find_order(&state, order_id).await?;
    let link = signature_url(state.config.public_base_url(), Some(&order.cpf));
    let png = render_qr_png(&link, state.config.qr_options())?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
