use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tinylink_core::{with_deadline, Redirector, Repository, ServiceError, ShortCode};
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Looks the code up in the repository and returns the stored target.
/// Expiry hints are left to the storage backend: a record that is still
/// returned is still resolved.
#[derive(Debug)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
    storage_timeout: Duration,
}

impl<R> Clone for RedirectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            storage_timeout: self.storage_timeout,
        }
    }
}

impl<R: Repository> RedirectorService<R> {
    /// Creates a new RedirectorService with the given repository.
    pub fn new(repository: R, storage_timeout: Duration) -> Self {
        Self::with_shared(Arc::new(repository), storage_timeout)
    }

    /// Creates a service over a repository shared with other services.
    pub fn with_shared(repository: Arc<R>, storage_timeout: Duration) -> Self {
        Self {
            repository,
            storage_timeout,
        }
    }
}

#[async_trait]
impl<R: Repository> Redirector for RedirectorService<R> {
    async fn resolve(&self, code: &str) -> Result<String, ServiceError> {
        let code = ShortCode::new(code)?;
        trace!(code = %code, "resolving short code");

        let found = with_deadline(self.storage_timeout, self.repository.find_by_code(&code))
            .await?;

        match found {
            Some(redirect) => {
                debug!(
                    code = %code,
                    url = %redirect.target_url,
                    expires_at = ?redirect.expires_at,
                    "resolved short code"
                );
                Ok(redirect.target_url)
            }
            None => {
                trace!(code = %code, "short code not found");
                Err(ServiceError::NotFound(code.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{SignedDuration, Timestamp};
    use tinylink_core::{ErrorKind, Redirect, StorageError};
    use tinylink_storage::InMemoryRepository;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    async fn setup_with_redirect(redirect: Redirect) -> RedirectorService<InMemoryRepository> {
        let repo = InMemoryRepository::new();
        repo.create(&redirect).await.unwrap();
        RedirectorService::new(repo, TIMEOUT)
    }

    struct StalledRepository;

    #[async_trait]
    impl Repository for StalledRepository {
        async fn create(&self, _redirect: &Redirect) -> tinylink_storage::Result<()> {
            std::future::pending().await
        }

        async fn find_by_code(
            &self,
            _code: &ShortCode,
        ) -> tinylink_storage::Result<Option<Redirect>> {
            std::future::pending().await
        }
    }

    struct CorruptRepository;

    #[async_trait]
    impl Repository for CorruptRepository {
        async fn create(&self, _redirect: &Redirect) -> tinylink_storage::Result<()> {
            Ok(())
        }

        async fn find_by_code(
            &self,
            code: &ShortCode,
        ) -> tinylink_storage::Result<Option<Redirect>> {
            Err(StorageError::InvalidData(format!("garbage under {code}")))
        }
    }

    #[tokio::test]
    async fn resolve_existing_code() {
        let service =
            setup_with_redirect(Redirect::new(code("abc123"), "https://example.com")).await;

        let url = service.resolve("abc123").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let service = RedirectorService::new(InMemoryRepository::new(), TIMEOUT);

        let err = service.resolve("nope").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref c) if c == "nope"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn malformed_code_is_rejected_before_lookup() {
        let service = RedirectorService::new(StalledRepository, TIMEOUT);

        let too_long = "x".repeat(65);
        for bad in ["", "has space", "semi;colon", too_long.as_str()] {
            let err = service.resolve(bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidShortCode(_)), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn expired_code_still_resolves() {
        let expired = Timestamp::now() - SignedDuration::from_secs(1);
        let service = setup_with_redirect(
            Redirect::new(code("expired"), "https://example.com").with_expires_at(Some(expired)),
        )
        .await;

        let url = service.resolve("expired").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test]
    async fn resolve_not_yet_expired() {
        let future = Timestamp::now() + SignedDuration::from_hours(1);
        let service = setup_with_redirect(
            Redirect::new(code("valid"), "https://example.com").with_expires_at(Some(future)),
        )
        .await;

        let url = service.resolve("valid").await.unwrap();
        assert_eq!(url, "https://example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_storage_times_out() {
        let service = RedirectorService::new(StalledRepository, Duration::from_millis(50));

        let err = service.resolve("abc123").await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout(_)));
    }

    #[tokio::test]
    async fn storage_failure_is_not_reported_as_missing() {
        let service = RedirectorService::new(CorruptRepository, TIMEOUT);

        let err = service.resolve("abc123").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Storage(StorageError::InvalidData(_))
        ));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn clones_share_the_repository() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = RedirectorService::with_shared(Arc::clone(&repo), TIMEOUT);
        let clone = service.clone();

        repo.create(&Redirect::new(code("late"), "https://example.com/late"))
            .await
            .unwrap();

        assert_eq!(clone.resolve("late").await.unwrap(), "https://example.com/late");
    }
}
