//! Admin session repository.
//!
//! Tokens are handed to the client once and only their SHA-256 digest is kept.

use chrono::{DateTime, Duration, Utc};
use shared::crypto::{generate_session_token, sha256_hex};

use crate::metrics::{record_store_sizes, StoreTimer};
use crate::store::Store;

/// An authenticated administrator session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Repository for admin sessions.
#[derive(Clone)]
pub struct SessionRepository {
    store: Store,
}

impl SessionRepository {
    /// Creates a new SessionRepository over the given store.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Open a session and return its plaintext token.
    pub async fn create(&self, username: &str, ttl: Duration) -> (String, AdminSession) {
        let timer = StoreTimer::new("create_session");
        let token = generate_session_token();
        let now = Utc::now();
        let session = AdminSession {
            username: username.to_string(),
            created_at: now,
            expires_at: now + ttl,
        };

        let mut state = self.store.write().await;
        state.sessions.insert(sha256_hex(&token), session.clone());
        record_store_sizes(&state);

        timer.record();
        (token, session)
    }

    /// Look up a live session by token. Expired sessions are dropped.
    pub async fn validate(&self, token: &str) -> Option<AdminSession> {
        let key = sha256_hex(token);
        let now = Utc::now();

        let mut state = self.store.write().await;
        match state.sessions.get(&key) {
            Some(session) if !session.is_expired(now) => Some(session.clone()),
            Some(_) => {
                state.sessions.remove(&key);
                None
            }
            None => None,
        }
    }

    /// End a session. Returns false when the token was unknown.
    pub async fn revoke(&self, token: &str) -> bool {
        let mut state = self.store.write().await;
        let removed = state.sessions.remove(&sha256_hex(token)).is_some();
        record_store_sizes(&state);
        removed
    }

    /// Remove every expired session, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut state = self.store.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, session| !session.is_expired(now));
        let purged = before - state.sessions.len();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired admin sessions");
            record_store_sizes(&state);
        }
        purged
    }
}
