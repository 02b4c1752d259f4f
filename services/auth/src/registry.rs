//! Per-client session storage for the hosting layer
//!
//! Each connected client holds an opaque token; the registry maps tokens to
//! their session values. Permission logic stays in [`SessionManager`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::Session;
use crate::session::SessionManager;

/// Token-keyed session registry
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly authenticated session
    pub async fn insert(&self, session: Session) {
        self.sessions.write().await.insert(session.token, session);
    }

    /// Resolve a token and record activity on it
    ///
    /// Expired sessions are removed and reported as such; the client has to
    /// log in again.
    pub async fn resume(
        &self,
        manager: &SessionManager,
        token: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;

        let Some(session) = sessions.get_mut(&token) else {
            return Err(SessionError::Anonymous);
        };

        if manager.touch(session, now).is_err() {
            info!("Session for user {} expired", session.identity);
            sessions.remove(&token);
            return Err(SessionError::Expired);
        }

        Ok(session.clone())
    }

    /// Drop a session, returning it if it existed
    pub async fn remove(&self, token: Uuid) -> Option<Session> {
        self.sessions.write().await.remove(&token)
    }

    /// Drop every session belonging to `identity`
    pub async fn remove_identity(&self, identity: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.identity != identity);
        before - sessions.len()
    }

    /// Remove sessions idle past the timeout
    pub async fn purge_expired(&self, manager: &SessionManager, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !manager.is_expired(s, now));
        let purged = before - sessions.len();

        if purged > 0 {
            info!("Purged {} expired sessions", purged);
        }
        purged
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_resume_touches_session() {
        let manager = SessionManager::default();
        let registry = SessionRegistry::new();
        let session = manager.start("alice", Role::Admin, t0());
        let token = session.token;
        registry.insert(session).await;

        let resumed = registry
            .resume(&manager, token, t0() + Duration::minutes(10))
            .await
            .unwrap();
        assert_eq!(resumed.last_active, t0() + Duration::minutes(10));

        // Still alive 20 minutes after login thanks to the touch
        assert!(
            registry
                .resume(&manager, token, t0() + Duration::minutes(20))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let manager = SessionManager::default();
        let registry = SessionRegistry::new();
        let session = manager.start("alice", Role::Viewer, t0());
        let token = session.token;
        registry.insert(session).await;

        let late = t0() + Duration::minutes(15);
        assert_eq!(
            registry.resume(&manager, token, late).await,
            Err(SessionError::Expired)
        );
        assert_eq!(
            registry.resume(&manager, token, late).await,
            Err(SessionError::Anonymous)
        );
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let registry = SessionRegistry::new();
        assert_eq!(
            registry
                .resume(&SessionManager::default(), Uuid::new_v4(), t0())
                .await,
            Err(SessionError::Anonymous)
        );
    }

    #[tokio::test]
    async fn test_purge_and_remove_identity() {
        let manager = SessionManager::default();
        let registry = SessionRegistry::new();
        registry
            .insert(manager.start("alice", Role::Admin, t0()))
            .await;
        registry
            .insert(manager.start("bob", Role::Viewer, t0() + Duration::minutes(10)))
            .await;
        registry
            .insert(manager.start("bob", Role::Viewer, t0() + Duration::minutes(10)))
            .await;

        assert_eq!(
            registry
                .purge_expired(&manager, t0() + Duration::minutes(16))
                .await,
            1
        );
        assert_eq!(registry.remove_identity("bob").await, 2);
        assert!(registry.is_empty().await);
    }
}
