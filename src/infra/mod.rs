//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Caching (Redis), also backing sessions and login throttling

pub mod cache;
pub mod db;
pub mod repositories;

pub use cache::Cache;
pub use db::{Database, Migrator};
pub use repositories::{AccountRepository, AccountStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockAccountRepository;
