//! Domain layer for the Ordens de Servico backend.
//!
//! This crate contains:
//! - Domain models (ServiceOrder, OrderTemplate, Collaborator)
//! - Business logic services (template resolution, signature capture, numbering, filtering)
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;

pub use errors::DomainError;
