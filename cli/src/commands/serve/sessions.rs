//! # Session Registry
//!
//! File: cli/src/commands/serve/sessions.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Every HTTP client conversation is a `Session` of its own. The registry
//! maps session IDs to independently locked sessions, so turns in different
//! sessions run concurrently while turns within one session run one at a
//! time, in arrival order.
//!
//! The outer `RwLock` is held only long enough to look up, insert or remove
//! an entry; it is never held across a model call.
//!
//! ## Lifecycle
//!
//! A session ends when its client deletes it, when it has been idle longer
//! than `SessionLimits::idle_timeout` (see `sweep_idle`), or when it is the
//! least recently active session and a new one would exceed
//! `SessionLimits::max_sessions`.
//!
use crate::assistant::Session;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// A session shared between the registry and the request working on it.
pub type SharedSession = Arc<Mutex<Session>>;

pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Bounds on how many sessions live at once and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Open sessions allowed at once. `0` means unlimited.
    pub max_sessions: usize,
    /// Inactivity after which a session is dropped by `sweep_idle`.
    pub idle_timeout: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }
}

struct SessionEntry {
    session: SharedSession,
    last_active: Instant,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    limits: SessionLimits,
}

impl SessionRegistry {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: Arc::default(),
            limits,
        }
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Registers `session` under a fresh random ID and returns the ID. At
    /// capacity, the least recently active session is dropped first.
    pub async fn insert(&self, session: Session) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;

        if self.limits.max_sessions > 0 && sessions.len() >= self.limits.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_active)
                .map(|(id, _)| *id);
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                info!(
                    "Session limit ({}) reached, dropped least recently active session {}",
                    self.limits.max_sessions, oldest
                );
            }
        }

        sessions.insert(
            id,
            SessionEntry {
                session: Arc::new(Mutex::new(session)),
                last_active: Instant::now(),
            },
        );
        id
    }

    /// Looks up a session and marks it active.
    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_active = Instant::now();
        Some(entry.session.clone())
    }

    /// Drops the session. Returns `false` if it did not exist.
    pub async fn remove(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops every session idle for at least `idle_timeout`. Returns how
    /// many were dropped. A turn already running keeps its own handle and
    /// completes normally.
    pub async fn sweep_idle(&self) -> usize {
        let timeout = self.limits.idle_timeout;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.last_active.elapsed() < timeout;
            if !keep {
                debug!("Expiring idle session {}", id);
            }
            keep
        });
        before - sessions.len()
    }
}
