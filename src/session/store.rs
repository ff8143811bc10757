//! Session storage.
//!
//! Request handlers only see the [`SessionStore`] trait; the process-local
//! [`InMemorySessionStore`] is the default backend.

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::config::SessionConfig;
use crate::loader::ContentKind;
use crate::session::error::{SessionError, SessionResult};
use crate::session::ids::SessionId;
use crate::session::types::{Session, Turn};
use crate::summarizer::Summary;

/// Boxed future type for session store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Session store trait.
pub trait SessionStore: Send + Sync {
    /// Store a new session and return its freshly generated identifier.
    ///
    /// # Errors
    /// Returns an error if storage access fails.
    fn create(
        &self,
        content: String,
        content_type: ContentKind,
        summary: Summary,
    ) -> StoreFuture<'_, SessionResult<SessionId>>;

    /// Load a session.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the session is unknown or expired.
    fn get(&self, id: SessionId) -> StoreFuture<'_, SessionResult<Session>>;

    /// Append a turn and return the full updated conversation log.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the session is unknown or expired.
    fn append_turn(&self, id: SessionId, turn: Turn) -> StoreFuture<'_, SessionResult<Vec<Turn>>>;

    /// Drop expired sessions and return how many were removed.
    fn purge_expired(&self) -> StoreFuture<'_, usize>;

    /// Number of sessions currently held.
    fn count(&self) -> StoreFuture<'_, usize>;
}

struct Entry {
    session: Session,
    last_access: Instant,
}

/// Process-local session store with idle expiry and a capacity bound.
pub struct InMemorySessionStore {
    sessions: DashMap<SessionId, Entry>,
    ttl: Option<Duration>,
    max_sessions: usize,
}

impl InMemorySessionStore {
    /// Create a store from configuration. A TTL of zero disables expiry.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let ttl = (config.ttl_seconds > 0).then(|| Duration::from_secs(config.ttl_seconds));
        Self::with_limits(ttl, config.max_sessions)
    }

    /// Create a store with explicit limits.
    #[must_use]
    pub fn with_limits(ttl: Option<Duration>, max_sessions: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    fn is_expired(ttl: Option<Duration>, entry: &Entry) -> bool {
        ttl.is_some_and(|ttl| entry.last_access.elapsed() > ttl)
    }

    fn insert(&self, session: Session) -> SessionId {
        self.enforce_capacity();

        let id = session.id;
        self.sessions.insert(
            id,
            Entry {
                session,
                last_access: Instant::now(),
            },
        );
        id
    }

    /// Make room for one more session, evicting the least recently used.
    fn enforce_capacity(&self) {
        if self.sessions.len() < self.max_sessions {
            return;
        }

        self.purge_now();

        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.value().last_access)
                .map(|entry| *entry.key());

            let Some(id) = oldest else {
                break;
            };
            self.sessions.remove(&id);
            debug!(session_id = %id, "Evicted least recently used session");
        }
    }

    fn get_now(&self, id: SessionId) -> SessionResult<Session> {
        let mut entry = self.sessions.get_mut(&id).ok_or(SessionError::NotFound)?;

        if Self::is_expired(self.ttl, &entry) {
            drop(entry);
            self.sessions.remove(&id);
            return Err(SessionError::NotFound);
        }

        entry.last_access = Instant::now();
        Ok(entry.session.clone())
    }

    fn append_now(&self, id: SessionId, turn: Turn) -> SessionResult<Vec<Turn>> {
        let mut entry = self.sessions.get_mut(&id).ok_or(SessionError::NotFound)?;

        if Self::is_expired(self.ttl, &entry) {
            drop(entry);
            self.sessions.remove(&id);
            return Err(SessionError::NotFound);
        }

        entry.last_access = Instant::now();
        entry.session.history.push(turn);
        Ok(entry.session.history.clone())
    }

    fn purge_now(&self) -> usize {
        let ttl = self.ttl;
        if ttl.is_none() {
            return 0;
        }

        let mut removed = 0;
        self.sessions.retain(|_, entry| {
            let keep = !Self::is_expired(ttl, entry);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl SessionStore for InMemorySessionStore {
    fn create(
        &self,
        content: String,
        content_type: ContentKind,
        summary: Summary,
    ) -> StoreFuture<'_, SessionResult<SessionId>> {
        Box::pin(async move {
            let session = Session::new(SessionId::new(), content, content_type, summary);
            Ok(self.insert(session))
        })
    }

    fn get(&self, id: SessionId) -> StoreFuture<'_, SessionResult<Session>> {
        Box::pin(async move { self.get_now(id) })
    }

    fn append_turn(&self, id: SessionId, turn: Turn) -> StoreFuture<'_, SessionResult<Vec<Turn>>> {
        Box::pin(async move { self.append_now(id, turn) })
    }

    fn purge_expired(&self) -> StoreFuture<'_, usize> {
        Box::pin(async move { self.purge_now() })
    }

    fn count(&self) -> StoreFuture<'_, usize> {
        Box::pin(async move { self.sessions.len() })
    }
}
