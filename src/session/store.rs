//! Session persistence - id generation and pluggable storage backends.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Session, SessionRecord};
use crate::config::CACHE_PREFIX_SESSION;
use crate::errors::AppResult;
use crate::infra::Cache;

/// Storage backend for session records.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn load(&self, id: &str) -> AppResult<Option<SessionRecord>>;

    async fn save(&self, id: &str, record: &SessionRecord, ttl_seconds: u64) -> AppResult<()>;

    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// Redis-backed session storage, keyed under the `session:` prefix.
pub struct RedisSessionBackend {
    cache: Arc<Cache>,
}

impl RedisSessionBackend {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }

    fn key(id: &str) -> String {
        format!("{}{}", CACHE_PREFIX_SESSION, id)
    }
}

#[async_trait]
impl SessionBackend for RedisSessionBackend {
    async fn load(&self, id: &str) -> AppResult<Option<SessionRecord>> {
        self.cache.get(&Self::key(id)).await
    }

    async fn save(&self, id: &str, record: &SessionRecord, ttl_seconds: u64) -> AppResult<()> {
        self.cache.set_with_ttl(&Self::key(id), record, ttl_seconds).await
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.cache.delete(&Self::key(id)).await
    }
}

/// In-memory session storage for development and tests.
///
/// Ignores TTLs; entries live until deleted or the process exits.
#[derive(Default)]
pub struct MemorySessionBackend {
    entries: Mutex<HashMap<String, SessionRecord>>,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn load(&self, id: &str) -> AppResult<Option<SessionRecord>> {
        Ok(self.entries.lock().await.get(id).cloned())
    }

    async fn save(&self, id: &str, record: &SessionRecord, _ttl_seconds: u64) -> AppResult<()> {
        self.entries.lock().await.insert(id.to_string(), record.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.entries.lock().await.remove(id);
        Ok(())
    }
}

/// Issues session ids and moves sessions between requests and a backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn SessionBackend>,
    ttl_seconds: u64,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>, ttl_seconds: u64) -> Self {
        Self {
            backend,
            ttl_seconds,
        }
    }

    /// Store backed by Redis through the shared cache layer.
    pub fn redis(cache: Arc<Cache>, ttl_seconds: u64) -> Self {
        Self::new(Arc::new(RedisSessionBackend::new(cache)), ttl_seconds)
    }

    /// Store backed by process memory (development and tests).
    pub fn in_memory(ttl_seconds: u64) -> Self {
        Self::new(Arc::new(MemorySessionBackend::new()), ttl_seconds)
    }

    fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Resolve the request's session from its cookie value.
    ///
    /// An absent cookie or an id unknown to the backend yields a fresh
    /// session; an expired or tampered id is indistinguishable from none.
    pub async fn load(&self, cookie: Option<&str>) -> AppResult<Session> {
        if let Some(id) = cookie {
            if let Some(record) = self.backend.load(id).await? {
                return Ok(Session::existing(id.to_string(), record));
            }
        }
        Ok(Session::fresh(Self::generate_id()))
    }

    /// Write the session back if it changed.
    ///
    /// Rotates the id when the session asked for renewal (login/logout),
    /// deleting the superseded record. Returns the id the client must be
    /// given when it does not already hold it.
    pub async fn persist(&self, session: &Session) -> AppResult<Option<String>> {
        if !session.is_modified() {
            return Ok(None);
        }

        let previous_id = session.id();
        let was_fresh = session.is_fresh();

        let id = if session.is_renewed() {
            if !was_fresh {
                self.backend.delete(&previous_id).await?;
            }
            let rotated = Self::generate_id();
            session.set_id(rotated.clone());
            rotated
        } else {
            previous_id.clone()
        };

        self.backend
            .save(&id, &session.record(), self.ttl_seconds)
            .await?;

        if was_fresh || id != previous_id {
            Ok(Some(id))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FlashLevel;

    #[tokio::test]
    async fn test_load_without_cookie_is_fresh() {
        let store = SessionStore::in_memory(60);

        let session = store.load(None).await.unwrap();

        assert!(!session.is_authenticated());
        assert!(!session.is_modified());
    }

    #[tokio::test]
    async fn test_unmodified_session_is_not_persisted() {
        let store = SessionStore::in_memory(60);

        let session = store.load(None).await.unwrap();
        let cookie = store.persist(&session).await.unwrap();

        assert!(cookie.is_none());
        // Nothing stored under the generated id
        let reloaded = store.load(Some(&session.id())).await.unwrap();
        assert!(!reloaded.is_authenticated());
    }

    #[tokio::test]
    async fn test_persist_and_reload_roundtrip() {
        let store = SessionStore::in_memory(60);
        let account_id = Uuid::new_v4();

        let session = store.load(None).await.unwrap();
        session.login(account_id, "user@example.com".to_string());
        session.flash(FlashLevel::Success, "Welcome back.");

        let cookie = store.persist(&session).await.unwrap();
        let cookie = cookie.expect("fresh modified session issues a cookie");

        let reloaded = store.load(Some(&cookie)).await.unwrap();
        assert_eq!(reloaded.account_id(), Some(account_id));
        assert_eq!(reloaded.take_flashes().len(), 1);
    }

    #[tokio::test]
    async fn test_login_rotates_the_session_id() {
        let store = SessionStore::in_memory(60);

        // Seed an anonymous session so a record exists under the old id
        let session = store.load(None).await.unwrap();
        session.flash(FlashLevel::Info, "seed");
        let old_cookie = store.persist(&session).await.unwrap().unwrap();

        // Log in through the old cookie
        let session = store.load(Some(&old_cookie)).await.unwrap();
        session.login(Uuid::new_v4(), "user@example.com".to_string());
        let new_cookie = store.persist(&session).await.unwrap().unwrap();

        assert_ne!(old_cookie, new_cookie);
        // The superseded record is gone
        let stale = store.load(Some(&old_cookie)).await.unwrap();
        assert!(!stale.is_authenticated());
        // The new record carries the identity
        let fresh = store.load(Some(&new_cookie)).await.unwrap();
        assert!(fresh.is_authenticated());
    }

    #[tokio::test]
    async fn test_touch_resaves_under_same_id() {
        let store = SessionStore::in_memory(60);

        let session = store.load(None).await.unwrap();
        session.login(Uuid::new_v4(), "user@example.com".to_string());
        let cookie = store.persist(&session).await.unwrap().unwrap();

        let session = store.load(Some(&cookie)).await.unwrap();
        session.touch();
        let reissued = store.persist(&session).await.unwrap();

        // Client already holds the id; no new cookie required
        assert!(reissued.is_none());
        assert_eq!(session.id(), cookie);
    }
}
