//! Dashboard summary models.

use serde::{Deserialize, Serialize};

use crate::models::ServiceOrder;

/// Order counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCounts {
    pub pending: usize,
    pub signed: usize,
    pub total: usize,
}

/// Admin dashboard payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub orders: OrderCounts,
    pub templates: usize,
    pub collaborators: usize,
    /// Most recently created orders, newest first.
    pub recent_orders: Vec<ServiceOrder>,
}
