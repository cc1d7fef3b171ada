//! Admin dashboard and reference data.

use axum::{extract::State, Json};
use domain::models::DashboardSummary;
use persistence::repositories::{CollaboratorRepository, OrderRepository, TemplateRepository};

use crate::app::AppState;

/// Number of orders shown in the "recent orders" panel.
const RECENT_ORDERS: usize = 5;

/// Dashboard counters and most recent orders.
///
/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    let orders = OrderRepository::new(state.store.clone());

    Json(DashboardSummary {
        orders: orders.counts().await,
        templates: TemplateRepository::new(state.store.clone()).count().await,
        collaborators: CollaboratorRepository::new(state.store.clone())
            .count()
            .await,
        recent_orders: orders.recent(RECENT_ORDERS).await,
    })
}

/// Units (filiais) known to the store.
///
/// GET /api/v1/units
pub async fn list_units(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.store.units().await)
}
