use crate::error::ServiceError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use std::sync::Arc;
use std::time::Duration;

type Result<T> = std::result::Result<T, ServiceError>;

/// Expiration policy for a shortened URL.
///
/// The resulting timestamp is a hint handed to storage; the core never
/// refuses to resolve an expired redirect.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExpirationPolicy {
    /// The shortened URL never expires.
    #[default]
    Never,
    /// The shortened URL expires after a certain duration from now.
    AfterDuration(Duration),
    /// The shortened URL expires at a specific timestamp.
    AtTimestamp(Timestamp),
}

impl ExpirationPolicy {
    /// Resolves the policy into an absolute expiry relative to `now`.
    ///
    /// An expiry at or before `now` is rejected: a key-value store would drop
    /// such a record as soon as it was written.
    pub fn expires_at(&self, now: Timestamp) -> Result<Option<Timestamp>> {
        let expires_at = match self {
            ExpirationPolicy::Never => return Ok(None),
            ExpirationPolicy::AfterDuration(duration) => {
                let duration = SignedDuration::try_from(*duration)
                    .map_err(|e| ServiceError::InvalidExpiration(e.to_string()))?;
                now.checked_add(duration)
                    .map_err(|e| ServiceError::InvalidExpiration(e.to_string()))?
            }
            ExpirationPolicy::AtTimestamp(timestamp) => *timestamp,
        };

        if expires_at <= now {
            return Err(ServiceError::InvalidExpiration(format!(
                "expiry {expires_at} is not after {now}"
            )));
        }
        Ok(Some(expires_at))
    }

    /// Builds a policy from a transport's optional lifetime in seconds.
    ///
    /// Absent means never; zero or negative values are rejected.
    pub fn from_ttl_seconds(ttl_seconds: Option<i64>) -> Result<Self> {
        match ttl_seconds {
            None => Ok(ExpirationPolicy::Never),
            Some(secs) if secs > 0 => Ok(ExpirationPolicy::AfterDuration(Duration::from_secs(
                secs.unsigned_abs(),
            ))),
            Some(secs) => Err(ServiceError::InvalidExpiration(format!(
                "ttl must be positive, got {secs}"
            ))),
        }
    }
}

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenParams {
    /// The original URL to be shortened.
    pub target_url: String,
    /// The expiration policy for the shortened URL.
    pub expiration: ExpirationPolicy,
}

impl ShortenParams {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            expiration: ExpirationPolicy::Never,
        }
    }

    pub fn with_expiration(mut self, expiration: ExpirationPolicy) -> Self {
        self.expiration = expiration;
        self
    }
}

/// The outcome of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub code: ShortCode,
    /// The externally visible link: the configured base joined with `code`.
    pub short_url: String,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores a new redirect for the target URL and returns its short link.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink>;
}

#[async_trait]
impl<S: Shortener + ?Sized> Shortener for Arc<S> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink> {
        (**self).shorten(params).await
    }
}
