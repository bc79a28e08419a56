use async_trait::async_trait;
use jiff::Timestamp;
use std::sync::Arc;
use tinylink_core::{
    with_deadline, Redirect, Repository, ServiceError, ServiceSettings, ShortLink, ShortenParams,
    Shortener, StorageError,
};
use tinylink_generator::Generator;
use tracing::{debug, trace, warn};
use url::Url;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation
/// - Expiration policy conversion
/// - Code generation with bounded retry on collision
///
/// Uniqueness is decided by the repository's atomic `create`: a candidate
/// code that is already taken comes back as `DuplicateCode` and a fresh one
/// is generated, up to `max_attempts` times in total.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    settings: ServiceSettings,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G, settings: ServiceSettings) -> Self {
        Self::with_shared(Arc::new(repository), generator, settings)
    }

    /// Creates a service over a repository shared with other services.
    pub fn with_shared(repository: Arc<R>, generator: G, settings: ServiceSettings) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
            settings,
        }
    }

    /// Validates that the URL is absolute, uses http(s), and names a host.
    pub fn validate_url(url: &str) -> Result<(), ServiceError> {
        if url.is_empty() {
            return Err(ServiceError::InvalidUrl("URL cannot be empty".to_string()));
        }

        if url.trim() != url {
            return Err(ServiceError::InvalidUrl(format!(
                "URL must not have surrounding whitespace: {:?}",
                url
            )));
        }

        // The URL parser strips tabs and newlines, but the stored target
        // must survive as a `Location` header unchanged.
        if url.chars().any(char::is_control) {
            return Err(ServiceError::InvalidUrl(format!(
                "URL must not contain control characters: {:?}",
                url
            )));
        }

        let parsed = Url::parse(url)
            .map_err(|e| ServiceError::InvalidUrl(format!("{}: {}", url, e)))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ServiceError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                scheme
            )));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ServiceError::InvalidUrl(format!(
                "URL must have a host: {}",
                url
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink, ServiceError> {
        Self::validate_url(&params.target_url)?;

        let now = Timestamp::now();
        let expires_at = params.expiration.expires_at(now)?;
        let max_attempts = self.settings.max_attempts.get();
        let mut last_conflict: Option<StorageError> = None;

        for attempt in 1..=max_attempts {
            let code = self.generator.generate().into();
            let redirect = Redirect {
                code,
                target_url: params.target_url.clone(),
                created_at: now,
                expires_at,
            };

            trace!(code = %redirect.code, attempt, "trying candidate code");

            match with_deadline(
                self.settings.storage_timeout,
                self.repository.create(&redirect),
            )
            .await
            {
                Ok(()) => {
                    debug!(code = %redirect.code, attempt, "stored redirect");
                    let short_url = redirect.code.to_url(&self.settings.short_link_base);
                    return Ok(ShortLink {
                        code: redirect.code,
                        short_url,
                    });
                }
                Err(err @ StorageError::DuplicateCode(_)) => {
                    debug!(code = %redirect.code, attempt, "short code collision, retrying");
                    last_conflict = Some(err);
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            attempts = max_attempts,
            last_error = ?last_conflict,
            "gave up generating a unique short code; widen the alphabet or code length"
        );
        Err(ServiceError::GenerationExhausted {
            attempts: max_attempts,
        })
    }
}
