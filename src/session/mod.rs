//! Server-side sessions referenced by a cookie.
//!
//! A `Session` is a cheaply clonable per-request handle around the loaded
//! record. Handlers and middleware mutate it freely; the session middleware
//! persists it once the response is ready, but only if something changed.
//! Binding an account (or clearing one) schedules an id rotation so a
//! pre-login session id never survives authentication.

mod store;

pub use store::{MemorySessionBackend, RedisSessionBackend, SessionBackend, SessionStore};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl FlashLevel {
    /// CSS class used when rendering the message.
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Info => "flash-info",
            FlashLevel::Success => "flash-success",
            FlashLevel::Warning => "flash-warning",
            FlashLevel::Error => "flash-error",
        }
    }
}

/// One-shot notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub text: String,
}

/// The persisted shape of a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRecord {
    pub account_id: Option<Uuid>,
    pub email: Option<String>,
    #[serde(default)]
    pub flashes: Vec<FlashMessage>,
}

struct Inner {
    id: String,
    record: SessionRecord,
    /// Record differs from what the backend holds; persist on response.
    modified: bool,
    /// Rotate the id at persist time (login/logout).
    renewed: bool,
    /// No backing record existed when the request arrived.
    fresh: bool,
}

/// Per-request session handle.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
}

impl Session {
    /// Session hydrated from an existing backend record.
    pub fn existing(id: String, record: SessionRecord) -> Self {
        Self::build(id, record, false)
    }

    /// Brand-new session with no backend record yet.
    pub fn fresh(id: String) -> Self {
        Self::build(id, SessionRecord::default(), true)
    }

    fn build(id: String, record: SessionRecord, fresh: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                id,
                record,
                modified: false,
                renewed: false,
                fresh,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current session id.
    pub fn id(&self) -> String {
        self.lock().id.clone()
    }

    pub(crate) fn set_id(&self, id: String) {
        self.lock().id = id;
    }

    /// Account bound to this session, if any.
    pub fn account_id(&self) -> Option<Uuid> {
        self.lock().record.account_id
    }

    /// Email of the bound account, if any.
    pub fn account_email(&self) -> Option<String> {
        self.lock().record.email.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().record.account_id.is_some()
    }

    /// Bind an account to the session.
    ///
    /// Schedules an id rotation so the pre-authentication id is retired.
    pub fn login(&self, account_id: Uuid, email: String) {
        let mut inner = self.lock();
        inner.record.account_id = Some(account_id);
        inner.record.email = Some(email);
        inner.modified = true;
        inner.renewed = true;
    }

    /// Drop all session state (identity and pending flashes).
    ///
    /// The id is rotated; the old record is deleted at persist time.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.record = SessionRecord::default();
        inner.modified = true;
        inner.renewed = true;
    }

    /// Queue a flash message for the next rendered page.
    pub fn flash(&self, level: FlashLevel, text: impl Into<String>) {
        let mut inner = self.lock();
        inner.record.flashes.push(FlashMessage {
            level,
            text: text.into(),
        });
        inner.modified = true;
    }

    /// Drain pending flash messages.
    pub fn take_flashes(&self) -> Vec<FlashMessage> {
        let mut inner = self.lock();
        if inner.record.flashes.is_empty() {
            return Vec::new();
        }
        inner.modified = true;
        std::mem::take(&mut inner.record.flashes)
    }

    /// Mark the session modified without changing its data.
    ///
    /// Forces a re-save at persist time, which refreshes the backend TTL.
    pub fn touch(&self) {
        self.lock().modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.lock().modified
    }

    pub(crate) fn is_renewed(&self) -> bool {
        self.lock().renewed
    }

    pub(crate) fn is_fresh(&self) -> bool {
        self.lock().fresh
    }

    pub(crate) fn record(&self) -> SessionRecord {
        self.lock().record.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_anonymous_and_unmodified() {
        let session = Session::fresh("abc".to_string());

        assert!(!session.is_authenticated());
        assert!(!session.is_modified());
        assert!(session.account_id().is_none());
    }

    #[test]
    fn test_login_binds_identity_and_schedules_rotation() {
        let session = Session::fresh("abc".to_string());
        let id = Uuid::new_v4();

        session.login(id, "user@example.com".to_string());

        assert!(session.is_authenticated());
        assert_eq!(session.account_id(), Some(id));
        assert_eq!(session.account_email().as_deref(), Some("user@example.com"));
        assert!(session.is_modified());
        assert!(session.is_renewed());
    }

    #[test]
    fn test_clear_drops_identity_and_flashes() {
        let session = Session::fresh("abc".to_string());
        session.login(Uuid::new_v4(), "user@example.com".to_string());
        session.flash(FlashLevel::Info, "hello");

        session.clear();

        assert!(!session.is_authenticated());
        assert!(session.take_flashes().is_empty());
    }

    #[test]
    fn test_flashes_drain_on_read() {
        let session = Session::fresh("abc".to_string());
        session.flash(FlashLevel::Warning, "first");
        session.flash(FlashLevel::Error, "second");

        let flashes = session.take_flashes();
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[0].level, FlashLevel::Warning);
        assert_eq!(flashes[0].text, "first");

        // Second read is empty
        assert!(session.take_flashes().is_empty());
    }

    #[test]
    fn test_touch_marks_modified_without_data_change() {
        let record = SessionRecord {
            account_id: Some(Uuid::new_v4()),
            email: Some("user@example.com".to_string()),
            flashes: Vec::new(),
        };
        let session = Session::existing("abc".to_string(), record);

        assert!(!session.is_modified());
        session.touch();
        assert!(session.is_modified());
        assert!(!session.is_renewed());
    }

    #[test]
    fn test_clones_share_state() {
        let session = Session::fresh("abc".to_string());
        let other = session.clone();

        other.flash(FlashLevel::Success, "shared");

        assert_eq!(session.take_flashes().len(), 1);
    }
}
