//! Service Container - Centralized service wiring.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{AccountManager, AccountService, AuthPipeline, EmailAuthenticator};
use crate::infra::AccountStore;

/// Holds the wired application services.
pub struct Services {
    auth: Arc<AuthPipeline>,
    accounts: Arc<dyn AccountService>,
}

impl Services {
    pub fn new(auth: Arc<AuthPipeline>, accounts: Arc<dyn AccountService>) -> Self {
        Self { auth, accounts }
    }

    /// Wire the default services from a database connection.
    ///
    /// The authentication pipeline carries a single candidate, the
    /// email/password backend; further candidates slot in here.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        let repository = Arc::new(AccountStore::new(db));

        let auth = Arc::new(AuthPipeline::single(Arc::new(EmailAuthenticator::new(
            repository.clone(),
        ))));
        let accounts = Arc::new(AccountManager::new(repository));

        Self { auth, accounts }
    }

    /// Get the authentication pipeline
    pub fn auth(&self) -> Arc<AuthPipeline> {
        self.auth.clone()
    }

    /// Get the account service
    pub fn accounts(&self) -> Arc<dyn AccountService> {
        self.accounts.clone()
    }
}
