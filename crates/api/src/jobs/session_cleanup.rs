//! Expired admin session cleanup.

use persistence::repositories::SessionRepository;
use persistence::Store;
use std::time::Duration;
use tracing::info;

use super::scheduler::Job;

/// Drops expired admin sessions from the store.
pub struct SessionCleanupJob {
    store: Store,
    interval: Duration,
}

impl SessionCleanupJob {
    pub fn new(store: Store, interval: Duration) -> Self {
        Self { store, interval }
    }
}

#[async_trait::async_trait]
impl Job for SessionCleanupJob {
    fn name(&self) -> &'static str {
        "session_cleanup"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn execute(&self) -> Result<(), String> {
        let purged = SessionRepository::new(self.store.clone())
            .purge_expired()
            .await;
        if purged > 0 {
            info!(purged, "Expired admin sessions removed");
        }
        Ok(())
    }
}
