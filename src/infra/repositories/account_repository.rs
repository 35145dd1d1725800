//! Account repository - Persistence for login accounts.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::account::{self, Entity as AccountEntity};
use crate::domain::Account;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by primary key
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;

    /// Find the single account with this exact email address.
    ///
    /// The store enforces uniqueness; observing more than one match means the
    /// data-integrity invariant is broken and is reported as an error rather
    /// than resolved by picking one.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Insert a new active account
    async fn create(&self, email: String, password_hash: String) -> AppResult<Account>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<Account>;

    /// Flip the active flag
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Account>;
}

/// SeaORM-backed implementation of AccountRepository.
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<account::Model> {
        AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let mut matches = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop().map(Account::from)),
            n => {
                tracing::error!(email = %email, count = n, "Email uniqueness invariant violated");
                Err(AppError::internal(format!(
                    "{} accounts share one email address",
                    n
                )))
            }
        }
    }

    async fn create(&self, email: String, password_hash: String) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let active_model = account::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Account::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<Account> {
        let mut active: account::ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Account::from(model))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<Account> {
        let mut active: account::ActiveModel = self.find_model(id).await?.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Account::from(model))
    }
}
