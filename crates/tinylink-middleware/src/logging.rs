use std::time::Instant;

use async_trait::async_trait;
use tinylink_core::{Redirector, ServiceError, ShortLink, ShortenParams, Shortener};
use tracing::{info, warn};
use url::Url;

/// Logs every call with its input, latency and outcome.
///
/// Target URLs are reduced to their host so paths and query strings, which
/// may carry credentials or tokens, stay out of the logs. The wrapped
/// service's result is passed through untouched.
#[derive(Debug, Clone)]
pub struct Logged<S> {
    inner: S,
}

impl<S> Logged<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

/// Reduces a URL to `scheme://host` for logging.
pub(crate) fn redact(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}", parsed.scheme(), host),
            None => format!("{}:", parsed.scheme()),
        },
        Err(_) => "<unparsable>".to_string(),
    }
}

#[async_trait]
impl<S: Shortener> Shortener for Logged<S> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink, ServiceError> {
        let target = redact(&params.target_url);
        let started = Instant::now();

        let result = self.inner.shorten(params).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(link) => info!(
                method = "shorten",
                target = %target,
                code = %link.code,
                elapsed_ms,
                "ok"
            ),
            Err(err) => warn!(
                method = "shorten",
                target = %target,
                kind = ?err.kind(),
                error = %err,
                elapsed_ms,
                "failed"
            ),
        }

        result
    }
}

#[async_trait]
impl<S: Redirector> Redirector for Logged<S> {
    async fn resolve(&self, code: &str) -> Result<String, ServiceError> {
        let started = Instant::now();

        let result = self.inner.resolve(code).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(url) => info!(
                method = "resolve",
                code,
                target = %redact(url),
                elapsed_ms,
                "ok"
            ),
            Err(err) => warn!(
                method = "resolve",
                code,
                kind = ?err.kind(),
                error = %err,
                elapsed_ms,
                "failed"
            ),
        }

        result
    }
}
