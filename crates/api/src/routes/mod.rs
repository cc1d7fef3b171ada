//! HTTP route handlers.

pub mod auth;
pub mod collaborators;
pub mod dashboard;
pub mod frontend;
pub mod health;
pub mod orders;
pub mod qrcode;
pub mod signature;
pub mod templates;
