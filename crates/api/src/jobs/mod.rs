//! Background job scheduler and job implementations.

mod scheduler;
mod session_cleanup;

pub use scheduler::{Job, JobScheduler};
pub use session_cleanup::SessionCleanupJob;
