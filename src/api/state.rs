//! Application state - Dependency injection container.
//!
//! Provides centralized access to the services and infrastructure the HTTP
//! surface needs. Account provisioning stays out of here; it is reachable
//! only through the CLI.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{AuthPipeline, Services};
use crate::session::SessionStore;

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication pipeline (candidates tried in order)
    pub auth: Arc<AuthPipeline>,
    /// Session store
    pub sessions: SessionStore,
    /// Redis cache
    pub cache: Arc<Cache>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from connected infrastructure and config.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: &Config) -> Self {
        let services = Services::from_connection(database.get_connection());
        let sessions = SessionStore::redis(cache.clone(), config.session_ttl_seconds);

        Self {
            auth: services.auth(),
            sessions,
            cache,
            database,
        }
    }

    /// Create application state with manually injected services.
    pub fn new(
        auth: Arc<AuthPipeline>,
        sessions: SessionStore,
        cache: Arc<Cache>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth,
            sessions,
            cache,
            database,
        }
    }
}
