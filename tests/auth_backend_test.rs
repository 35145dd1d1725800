//! Authentication backend integration tests.
//!
//! Exercise the email/password backend and the candidate pipeline through
//! the public API, against an in-memory repository stub.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use gatehouse::domain::{Account, Password};
use gatehouse::errors::{AppError, AppResult};
use gatehouse::infra::AccountRepository;
use gatehouse::services::{AuthBackend, AuthPipeline, EmailAuthenticator};

/// In-memory account repository stub.
///
/// Mirrors the store's lookup semantics, including the loud failure when
/// the email uniqueness invariant is violated.
struct StubAccountRepository {
    accounts: Vec<Account>,
}

impl StubAccountRepository {
    fn new(accounts: Vec<Account>) -> Arc<Self> {
        Arc::new(Self { accounts })
    }
}

#[async_trait]
impl AccountRepository for StubAccountRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let matches: Vec<&Account> = self.accounts.iter().filter(|a| a.email == email).collect();
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next().cloned()),
            n => Err(AppError::internal(format!(
                "{} accounts share one email address",
                n
            ))),
        }
    }

    async fn create(&self, email: String, password_hash: String) -> AppResult<Account> {
        Ok(Account::new(Uuid::new_v4(), email, password_hash))
    }

    async fn update_password(&self, _id: Uuid, _password_hash: String) -> AppResult<Account> {
        Err(AppError::NotFound)
    }

    async fn set_active(&self, _id: Uuid, _is_active: bool) -> AppResult<Account> {
        Err(AppError::NotFound)
    }
}

fn account(email: &str, password: &str) -> Account {
    Account::new(
        Uuid::new_v4(),
        email.to_string(),
        Password::new(password).expect("test password hashes").into_string(),
    )
}

fn backend_with(accounts: Vec<Account>) -> EmailAuthenticator {
    EmailAuthenticator::new(StubAccountRepository::new(accounts))
}

#[tokio::test]
async fn test_correct_credentials_resolve_the_account() {
    let stored = account("user@example.com", "secret123");
    let expected_id = stored.id;
    let backend = backend_with(vec![stored]);

    let result = backend
        .authenticate("user@example.com", "secret123")
        .await
        .expect("lookup succeeds");

    assert_eq!(result.map(|a| a.id), Some(expected_id));
}

#[tokio::test]
async fn test_wrong_password_resolves_nobody() {
    let backend = backend_with(vec![account("user@example.com", "secret123")]);

    let result = backend.authenticate("user@example.com", "wrong").await;

    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_unknown_email_resolves_nobody() {
    let backend = backend_with(vec![account("user@example.com", "secret123")]);

    let result = backend.authenticate("nobody@example.com", "secret123").await;

    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_email_matching_is_case_sensitive() {
    let backend = backend_with(vec![account("user@example.com", "secret123")]);

    let result = backend.authenticate("User@Example.com", "secret123").await;

    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_empty_and_malformed_credentials_do_not_error() {
    let backend = backend_with(vec![account("user@example.com", "secret123")]);

    assert!(matches!(backend.authenticate("", "").await, Ok(None)));
    assert!(matches!(
        backend.authenticate("user@example.com", "").await,
        Ok(None)
    ));
    assert!(matches!(
        backend.authenticate("definitely not an email", "pw").await,
        Ok(None)
    ));
}

#[tokio::test]
async fn test_repeated_attempts_yield_the_same_answer() {
    let backend = backend_with(vec![account("user@example.com", "secret123")]);

    for _ in 0..3 {
        let result = backend
            .authenticate("user@example.com", "secret123")
            .await
            .expect("lookup succeeds");
        assert!(result.is_some());
    }
}

#[tokio::test]
async fn test_duplicate_emails_surface_as_errors() {
    let backend = backend_with(vec![
        account("dup@example.com", "secret123"),
        account("dup@example.com", "other456"),
    ]);

    let result = backend.authenticate("dup@example.com", "secret123").await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn test_pipeline_tries_candidates_in_order() {
    let first = backend_with(vec![account("first@example.com", "secret123")]);
    let second = backend_with(vec![account("second@example.com", "secret123")]);
    let pipeline = AuthPipeline::new(vec![Arc::new(first), Arc::new(second)]);

    // Resolved by the second candidate after the first falls through
    let resolved = pipeline
        .authenticate("second@example.com", "secret123")
        .await
        .expect("lookup succeeds")
        .expect("second backend resolves");
    assert_eq!(resolved.email, "second@example.com");

    // Unknown everywhere
    let missing = pipeline.authenticate("nobody@example.com", "secret123").await;
    assert!(matches!(missing, Ok(None)));
}

#[tokio::test]
async fn test_pipeline_propagates_backend_errors() {
    let broken = backend_with(vec![
        account("dup@example.com", "secret123"),
        account("dup@example.com", "other456"),
    ]);
    let healthy = backend_with(vec![account("dup@example.com", "secret123")]);
    let pipeline = AuthPipeline::new(vec![Arc::new(broken), Arc::new(healthy)]);

    let result = pipeline.authenticate("dup@example.com", "secret123").await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}
