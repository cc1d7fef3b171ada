//! Persistence layer for the Ordens de Servico backend.
//!
//! This crate contains:
//! - The process-wide in-memory store
//! - Repository implementations over the store
//! - Seed data loaded at startup

pub mod metrics;
pub mod repositories;
pub mod seed;
pub mod store;

pub use store::{Store, StoreState};
