//! Repository implementations over the in-memory store.

pub mod collaborator;
pub mod order;
pub mod session;
pub mod template;

pub use collaborator::CollaboratorRepository;
pub use order::OrderRepository;
pub use session::{AdminSession, SessionRepository};
pub use template::TemplateRepository;
