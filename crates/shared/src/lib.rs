//! Shared utilities and common types for the Ordens de Servico backend.
//!
//! This crate provides common functionality used across all other crates:
//! - CPF normalization, formatting and masking
//! - Session token generation and hashing
//! - Offset pagination
//! - Common validation logic

pub mod cpf;
pub mod crypto;
pub mod pagination;
pub mod validation;
