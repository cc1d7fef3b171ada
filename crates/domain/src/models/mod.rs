//! Domain models for Ordens de Servico.

pub mod auth;
pub mod collaborator;
pub mod dashboard;
pub mod order;
pub mod template;

pub use collaborator::Collaborator;
pub use dashboard::{DashboardSummary, OrderCounts};
pub use order::{OrderDraft, OrderField, OrderSignature, OrderStatus, ServiceOrder};
pub use template::{default_fields, OrderTemplate, TemplateField};
