//! In-memory caching using moka
//!
//! Open offer sessions live here between requests. Sessions that sit idle
//! past the configured TTL are evicted; closing a session removes it.

use moka::future::Cache;
use moka::notification::RemovalCause;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::interval;
use tracing::{debug, info};
use uuid::Uuid;

use crate::offer::OfferSession;

/// One session, locked for the duration of each operation
pub type SharedSession = Arc<Mutex<OfferSession>>;

/// Open wizard sessions keyed by session id
#[derive(Clone)]
pub struct SessionCache {
    sessions: Cache<Uuid, SharedSession>,
}

impl SessionCache {
    pub fn new(max_sessions: u64, idle: Duration) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(max_sessions)
                .time_to_idle(idle)
                .eviction_listener(|id: Arc<Uuid>, _session, cause| {
                    if cause != RemovalCause::Explicit {
                        debug!("Offer session {} evicted ({:?})", id, cause);
                    }
                })
                .build(),
        }
    }

    /// Store a new session and hand back its shared handle
    pub async fn open(&self, session: OfferSession) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone()).await;
        info!("Offer session {} opened", id);
        shared
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).await
    }

    /// Drop a session from the cache, returning it if it was open
    pub async fn remove(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.remove(id).await
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            open_sessions: self.sessions.entry_count(),
        }
    }

    pub async fn run_pending_tasks(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(60 * 60))
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub open_sessions: u64,
}

/// Periodically flush expired sessions so idle ones are released promptly.
pub async fn start_session_janitor(cache: SessionCache, every: Duration) {
    let mut interval = interval(every);
    loop {
        interval.tick().await;
        cache.run_pending_tasks().await;
        debug!("Session cache maintenance done. Stats: {:?}", cache.stats());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::OfferType;

    #[tokio::test]
    async fn test_open_get_remove() {
        let cache = SessionCache::default();
        let session = OfferSession::new(OfferType::Najem);
        let id = session.id();

        cache.open(session).await;
        let shared = cache.get(&id).await.expect("session is cached");
        assert_eq!(shared.lock().await.offer_type(), OfferType::Najem);

        assert!(cache.remove(&id).await.is_some());
        assert!(cache.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_stats_count_open_sessions() {
        let cache = SessionCache::default();
        cache.open(OfferSession::new(OfferType::Nakup)).await;
        cache.open(OfferSession::new(OfferType::Dodatna)).await;
        cache.run_pending_tasks().await;
        assert_eq!(cache.stats().open_sessions, 2);
    }

    #[tokio::test]
    async fn test_shared_handle_sees_edits() {
        let cache = SessionCache::default();
        let session = OfferSession::new(OfferType::Najem);
        let id = session.id();
        let shared = cache.open(session).await;
        shared.lock().await.close();

        let again = cache.get(&id).await.expect("session is cached");
        assert!(again.lock().await.is_closed());
    }
}
