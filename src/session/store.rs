//! In-process session storage.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{SessionBackend, SessionData, SessionError, SessionId};

/// Default idle timeout (30 minutes).
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct SessionRecord {
    values: SessionData,
    last_activity: DateTime<Utc>,
}

impl SessionRecord {
    fn is_expired_with_timeout(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        // Negative duration means clock skew; keep the record.
        (now - self.last_activity)
            .to_std()
            .is_ok_and(|idle| idle > timeout)
    }
}

/// Thread-safe store for visitor sessions.
///
/// Cloning is cheap and every clone shares the same map.
#[derive(Debug, Clone)]
pub struct MemorySessionStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove sessions that have been inactive longer than `timeout`.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let now = Utc::now();
        let mut guard = self
            .inner
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = guard.len();
        guard.retain(|_, record| !record.is_expired_with_timeout(now, timeout));
        before - guard.len()
    }

    /// Spawn a task that sweeps expired sessions every `every`.
    pub fn spawn_sweeper(&self, timeout: Duration, every: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let removed = store.cleanup_expired_with_timeout(timeout);
                if removed > 0 {
                    debug!(
                        name: "session.sweep",
                        removed,
                        remaining = store.len(),
                        "Expired sessions removed"
                    );
                }
            }
        })
    }
}

impl SessionBackend for MemorySessionStore {
    fn load(&self, id: &SessionId) -> Result<Option<SessionData>, SessionError> {
        let guard = self
            .inner
            .sessions
            .read()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        Ok(guard.get(id).map(|record| record.values.clone()))
    }

    fn store(&self, id: &SessionId, data: &SessionData) -> Result<(), SessionError> {
        let mut guard = self
            .inner
            .sessions
            .write()
            .map_err(|e| SessionError::Save(e.to_string()))?;
        guard.insert(
            *id,
            SessionRecord {
                values: data.clone(),
                last_activity: Utc::now(),
            },
        );
        Ok(())
    }
}
