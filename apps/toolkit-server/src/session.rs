//! Per-user session state: QR history and the selected template

use chrono::{DateTime, Utc};
use qr_core::QrHistory;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    last_seen: Instant,
    pub qr_history: QrHistory,
    /// Payload of the last selected QR template
    pub template_data: Option<String>,
}

impl Session {
    fn new() -> Self {
        Session {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            last_seen: Instant::now(),
            qr_history: QrHistory::default(),
            template_data: None,
        }
    }
}

/// Sessions keyed by id; idle ones are evicted whenever the store is touched
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let session = Session::new();
        let id = session.id;

        let mut sessions = self.sessions.write().await;
        self.evict_expired(&mut sessions);
        sessions.insert(id, session);
        debug!(%id, active = sessions.len(), "session created");
        id
    }

    /// Drop a session and everything it holds. False when it did not exist.
    pub async fn end(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        self.evict_expired(&mut sessions);
        sessions.remove(&id).is_some()
    }

    /// Run `f` against a live session, refreshing its idle timer
    pub async fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut sessions = self.sessions.write().await;
        self.evict_expired(&mut sessions);
        let session = sessions.get_mut(&id)?;
        session.last_seen = Instant::now();
        Some(f(session))
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn evict_expired(&self, sessions: &mut HashMap<Uuid, Session>) {
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() <= self.ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "expired sessions dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let store = SessionStore::new(Duration::from_secs(60));
        let id = store.create().await;

        let stored = store
            .with_session(id, |s| {
                s.template_data = Some("geo:1,2".into());
                s.id
            })
            .await;
        assert_eq!(stored, Some(id));
        assert_eq!(
            store.with_session(id, |s| s.template_data.clone()).await,
            Some(Some("geo:1,2".to_string()))
        );

        assert!(store.end(id).await);
        assert!(!store.end(id).await);
        assert!(store.with_session(id, |_| ()).await.is_none());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = SessionStore::new(Duration::ZERO);
        let id = store.create().await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(store.with_session(id, |_| ()).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a, b);

        store
            .with_session(a, |s| s.template_data = Some("a".into()))
            .await;
        assert_eq!(
            store.with_session(b, |s| s.template_data.clone()).await,
            Some(None)
        );
    }
}
