use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tinylink_core::{Redirector, ServiceError, ShortLink, ShortenParams, Shortener};
use tracing::debug;

/// Token bucket parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Calls admitted back to back before throttling kicks in.
    pub bucket: NonZeroU32,
    /// Tokens returned to the bucket every second.
    pub per_second: NonZeroU32,
}

impl RateLimitSettings {
    pub fn new(bucket: NonZeroU32, per_second: NonZeroU32) -> Self {
        Self { bucket, per_second }
    }

    fn quota(&self) -> Quota {
        Quota::per_second(self.per_second).allow_burst(self.bucket)
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        let ten = NonZeroU32::MIN.saturating_add(9);
        Self::new(ten, ten)
    }
}

/// Rejects calls once its token bucket is empty.
///
/// Each wrapper owns one bucket, shared by its clones. A rejected call
/// returns [`ServiceError::RateLimited`] immediately and never reaches the
/// inner service.
pub struct RateLimited<S> {
    inner: S,
    limiter: Arc<DefaultDirectRateLimiter>,
}

impl<S: fmt::Debug> fmt::Debug for RateLimited<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimited")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S: Clone> Clone for RateLimited<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            limiter: Arc::clone(&self.limiter),
        }
    }
}

impl<S> RateLimited<S> {
    pub fn new(inner: S, settings: RateLimitSettings) -> Self {
        Self {
            inner,
            limiter: Arc::new(RateLimiter::direct(settings.quota())),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn admit(&self, method: &'static str) -> Result<(), ServiceError> {
        self.limiter.check().map_err(|_| {
            debug!(method, "rate limit exceeded");
            ServiceError::RateLimited(method)
        })
    }
}

#[async_trait]
impl<S: Shortener> Shortener for RateLimited<S> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink, ServiceError> {
        self.admit("shorten")?;
        self.inner.shorten(params).await
    }
}

#[async_trait]
impl<S: Redirector> Redirector for RateLimited<S> {
    async fn resolve(&self, code: &str) -> Result<String, ServiceError> {
        self.admit("resolve")?;
        self.inner.resolve(code).await
    }
}
