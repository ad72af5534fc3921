//! In-memory session store
//!
//! One entry per user, holding the current step and the last time a message
//! from that user was processed. Entries idle for longer than the TTL are
//! removed by a background sweep. Nothing survives a restart; a lost session
//! simply puts the user back at `Idle`.

use crate::state_machine::ConvState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Sessions idle longer than this are evicted (24 hours)
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How often the sweep runs (1 hour)
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Per-user conversation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub step: ConvState,
    pub last_activity: Instant,
}

impl Session {
    fn new(user_id: &str, now: Instant) -> Self {
        Self {
            user_id: user_id.to_string(),
            step: ConvState::Idle,
            last_activity: now,
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_activity) > ttl
    }
}

/// Store of all live sessions behind one coarse lock.
///
/// Lookups, step commits and the sweep all take the same lock. Callers never
/// hold it across an outbound send.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the user's session, creating it at `Idle` if unseen.
    ///
    /// Every call records activity, so a user in the middle of a
    /// conversation is never swept.
    pub async fn get_or_create(&self, user_id: &str, now: Instant) -> Session {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user_id.to_string()).or_insert_with(|| {
            tracing::debug!(user_id, "Creating session");
            Session::new(user_id, now)
        });
        if now > session.last_activity {
            session.last_activity = now;
        }
        session.clone()
    }

    /// Commit a new step. A session swept while its message was being
    /// handled is re-created with `now` as its activity; returns false when
    /// that happened.
    pub async fn set_step(&self, user_id: &str, step: ConvState, now: Instant) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(user_id) {
            Some(session) => {
                if session.step != step {
                    tracing::debug!(user_id, from = %session.step, to = %step, "Step changed");
                }
                session.step = step;
                true
            }
            None => {
                let mut session = Session::new(user_id, now);
                session.step = step;
                sessions.insert(user_id.to_string(), session);
                false
            }
        }
    }

    #[cfg(test)]
    pub async fn get(&self, user_id: &str) -> Option<Session> {
        self.sessions.read().await.get(user_id).cloned()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove every session idle for longer than `ttl`. Returns how many
    /// were removed.
    pub async fn sweep(&self, now: Instant, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, ttl));
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::info!(removed, remaining = sessions.len(), "Swept idle sessions");
        }
        removed
    }

    /// Start the periodic sweep. The task holds only a weak reference and
    /// exits once the store is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration, ttl: Duration) -> JoinHandle<()> {
        let store = Arc::downgrade(self);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                if let Some(store) = store.upgrade() {
                    store.sweep(Instant::now(), ttl).await;
                } else {
                    tracing::debug!("SessionStore dropped, sweeper exiting");
                    break;
                }
            }
        })
    }
}
