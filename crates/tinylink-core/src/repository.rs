use crate::error::Result;
use crate::redirect::Redirect;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage contract for redirects.
///
/// Implementations must make [`create`](Repository::create) a single atomic
/// insert-if-absent from the backend's point of view, and every successful
/// `create` must be visible to a subsequent [`find_by_code`](Repository::find_by_code).
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Inserts a new redirect. Returns `Err(DuplicateCode)` if the code already exists.
    async fn create(&self, redirect: &Redirect) -> Result<()>;

    /// Retrieves the redirect for a given short code.
    /// Returns `None` if the code does not exist.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Redirect>>;
}

#[async_trait]
impl<R: Repository + ?Sized> Repository for Arc<R> {
    async fn create(&self, redirect: &Redirect) -> Result<()> {
        (**self).create(redirect).await
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Redirect>> {
        (**self).find_by_code(code).await
    }
}
