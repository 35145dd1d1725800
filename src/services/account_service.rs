//! Account service - Operator-facing account provisioning.
//!
//! Accounts are created and maintained through the CLI, never through the
//! authentication surface. Addresses are stored verbatim; matching is exact,
//! so operators who want case-insensitive logins should normalize here.

use async_trait::async_trait;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::config::MAX_EMAIL_LENGTH;
use crate::domain::{Account, Password};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::AccountRepository;

/// Account management trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Provision a new active account
    async fn create_account(&self, email: String, password: String) -> AppResult<Account>;

    /// Replace an account's password
    async fn set_password(&self, email: &str, password: String) -> AppResult<Account>;

    /// Mark an account inactive
    async fn deactivate(&self, email: &str) -> AppResult<Account>;
}

/// Concrete implementation of AccountService.
pub struct AccountManager {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountManager {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn create_account(&self, email: String, password: String) -> AppResult<Account> {
        if email.len() > MAX_EMAIL_LENGTH as usize || !email.validate_email() {
            return Err(AppError::validation("Invalid email format"));
        }

        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Account"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.accounts.create(email, password_hash).await
    }

    async fn set_password(&self, email: &str, password: String) -> AppResult<Account> {
        let account = self.accounts.find_by_email(email).await?.ok_or_not_found()?;

        let password_hash = Password::new(&password)?.into_string();
        self.accounts.update_password(account.id, password_hash).await
    }

    async fn deactivate(&self, email: &str) -> AppResult<Account> {
        let account = self.accounts.find_by_email(email).await?.ok_or_not_found()?;

        self.accounts.set_active(account.id, false).await
    }
}
