//! Authentication service - resolves credential attempts to accounts.
//!
//! `EmailAuthenticator` is one candidate in an ordered pipeline: the login
//! handler asks the pipeline, the pipeline asks each backend in turn. A
//! backend answers `Ok(None)` for every ordinary "no match" so the pipeline
//! can keep going; errors are reserved for conditions an operator must see.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Account, Password};
use crate::errors::AppResult;
use crate::infra::AccountRepository;

/// One authenticator candidate.
///
/// Implementations must not error for empty, malformed or unknown
/// credentials; those are `Ok(None)`.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<Account>>;
}

/// Resolves accounts by exact email match and Argon2 password verification.
///
/// The found and not-found branches cost the same hash work: a missing
/// account burns one dummy computation over the presented password, so
/// response latency does not reveal whether an address is registered.
pub struct EmailAuthenticator {
    accounts: Arc<dyn AccountRepository>,
}

impl EmailAuthenticator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AuthBackend for EmailAuthenticator {
    async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<Account>> {
        match self.accounts.find_by_email(email).await? {
            Some(account) => {
                let stored = Password::from_hash(account.password_hash.clone());
                if stored.verify(password) {
                    Ok(Some(account))
                } else {
                    Ok(None)
                }
            }
            None => {
                // Mirror the verification cost of the found branch
                Password::dummy(password);
                Ok(None)
            }
        }
    }
}

/// Ordered list of authenticator candidates.
pub struct AuthPipeline {
    backends: Vec<Arc<dyn AuthBackend>>,
}

impl AuthPipeline {
    pub fn new(backends: Vec<Arc<dyn AuthBackend>>) -> Self {
        Self { backends }
    }

    /// Pipeline with a single candidate.
    pub fn single(backend: Arc<dyn AuthBackend>) -> Self {
        Self::new(vec![backend])
    }

    /// Try each candidate in registration order.
    ///
    /// The first resolved account wins; `None` falls through to the next
    /// candidate; an error aborts the attempt.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Option<Account>> {
        for backend in &self.backends {
            if let Some(account) = backend.authenticate(email, password).await? {
                return Ok(Some(account));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::password::instrumentation;
    use crate::errors::AppError;
    use crate::infra::MockAccountRepository;
    use uuid::Uuid;

    fn account_with_password(email: &str, password: &str) -> Account {
        Account::new(
            Uuid::new_v4(),
            email.to_string(),
            Password::new(password).unwrap().into_string(),
        )
    }

    #[tokio::test]
    async fn test_correct_password_resolves_account() {
        let account = account_with_password("user@example.com", "secret123");
        let expected_id = account.id;

        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));

        let backend = EmailAuthenticator::new(Arc::new(repo));
        let result = backend
            .authenticate("user@example.com", "secret123")
            .await
            .unwrap();

        assert_eq!(result.map(|a| a.id), Some(expected_id));
    }

    #[tokio::test]
    async fn test_wrong_password_is_none_not_error() {
        let account = account_with_password("user@example.com", "secret123");

        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));

        let backend = EmailAuthenticator::new(Arc::new(repo));
        let result = backend.authenticate("user@example.com", "wrong").await;

        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_unknown_email_burns_exactly_one_hash() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let backend = EmailAuthenticator::new(Arc::new(repo));

        instrumentation::reset_hash_runs();
        let result = backend
            .authenticate("nobody@example.com", "secret123")
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(instrumentation::hash_runs(), 1);
    }

    #[tokio::test]
    async fn test_miss_and_wrong_password_cost_the_same() {
        let account = account_with_password("user@example.com", "secret123");

        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            if email == "user@example.com" {
                Ok(Some(account.clone()))
            } else {
                Ok(None)
            }
        });

        let backend = EmailAuthenticator::new(Arc::new(repo));

        instrumentation::reset_hash_runs();
        backend
            .authenticate("user@example.com", "wrong")
            .await
            .unwrap();
        let wrong_password_runs = instrumentation::hash_runs();

        instrumentation::reset_hash_runs();
        backend
            .authenticate("nobody@example.com", "wrong")
            .await
            .unwrap();
        let missing_account_runs = instrumentation::hash_runs();

        assert_eq!(wrong_password_runs, missing_account_runs);
    }

    #[tokio::test]
    async fn test_empty_credentials_do_not_error() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let backend = EmailAuthenticator::new(Arc::new(repo));

        assert!(matches!(backend.authenticate("", "").await, Ok(None)));
        assert!(matches!(
            backend.authenticate("not-an-email", "pw").await,
            Ok(None)
        ));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_idempotent() {
        let account = account_with_password("user@example.com", "secret123");

        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(account.clone())));

        let backend = EmailAuthenticator::new(Arc::new(repo));

        let first = backend
            .authenticate("user@example.com", "secret123")
            .await
            .unwrap()
            .map(|a| a.id);
        let second = backend
            .authenticate("user@example.com", "secret123")
            .await
            .unwrap()
            .map(|a| a.id);

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_integrity_violation_propagates() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(AppError::internal("2 accounts share one email address")));

        let backend = EmailAuthenticator::new(Arc::new(repo));
        let result = backend.authenticate("dup@example.com", "pw").await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    /// Backend stub with a fixed answer and a call counter.
    struct FixedBackend {
        answer: Option<Account>,
        calls: AtomicUsize,
    }

    impl FixedBackend {
        fn new(answer: Option<Account>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AuthBackend for FixedBackend {
        async fn authenticate(&self, _email: &str, _password: &str) -> AppResult<Option<Account>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    #[tokio::test]
    async fn test_pipeline_falls_through_none() {
        let account = account_with_password("user@example.com", "secret123");
        let first = FixedBackend::new(None);
        let second = FixedBackend::new(Some(account));

        let pipeline = AuthPipeline::new(vec![first.clone(), second.clone()]);
        let result = pipeline
            .authenticate("user@example.com", "secret123")
            .await
            .unwrap();

        assert!(result.is_some());
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pipeline_stops_at_first_match() {
        let account = account_with_password("user@example.com", "secret123");
        let first = FixedBackend::new(Some(account));
        let second = FixedBackend::new(None);

        let pipeline = AuthPipeline::new(vec![first.clone(), second.clone()]);
        pipeline
            .authenticate("user@example.com", "secret123")
            .await
            .unwrap();

        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_pipeline_resolves_nobody() {
        let pipeline = AuthPipeline::new(Vec::new());
        let result = pipeline.authenticate("user@example.com", "pw").await;

        assert!(matches!(result, Ok(None)));
    }
}
