use crate::error::ServiceError;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its target URL.
    ///
    /// Returns `Err(NotFound)` if no redirect is stored under `code`.
    async fn resolve(&self, code: &str) -> Result<String, ServiceError>;
}

#[async_trait]
impl<R: Redirector + ?Sized> Redirector for Arc<R> {
    async fn resolve(&self, code: &str) -> Result<String, ServiceError> {
        (**self).resolve(code).await
    }
}
