//! In-memory store shared by all repositories.

use domain::models::{Collaborator, OrderTemplate, ServiceOrder};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::repositories::session::AdminSession;

/// Everything the application holds. Lost on restart.
#[derive(Debug, Default)]
pub struct StoreState {
    pub orders: Vec<ServiceOrder>,
    pub templates: Vec<OrderTemplate>,
    pub collaborators: Vec<Collaborator>,
    /// Admin sessions keyed by SHA-256 of the token
    pub sessions: HashMap<String, AdminSession>,
    /// Known unit names, in display order
    pub units: Vec<String>,
}

/// Cloneable handle to the process-wide store.
///
/// Every check-then-mutate sequence runs under a single write guard.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<StoreState>>,
}

impl Store {
    /// Creates an empty store that accepts the given units.
    pub fn new(units: Vec<String>) -> Self {
        Self::from_state(StoreState {
            units,
            ..Default::default()
        })
    }

    pub fn from_state(state: StoreState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner.write().await
    }

    /// Known units.
    pub async fn units(&self) -> Vec<String> {
        self.read().await.units.clone()
    }

    /// Always succeeds; used by readiness checks.
    pub async fn ping(&self) -> bool {
        let _guard = self.read().await;
        true
    }
}
