use std::num::NonZeroUsize;
use std::time::Duration;
use typed_builder::TypedBuilder;

pub const DEFAULT_MAX_ATTEMPTS: NonZeroUsize = NonZeroUsize::MIN.saturating_add(4);
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Immutable settings shared by the shortener and redirector services.
///
/// Built once at startup and handed to service constructors; nothing in the
/// services reads process-wide state.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceSettings {
    /// Base URL that generated codes are appended to.
    #[builder(setter(into))]
    pub short_link_base: String,
    /// Upper bound on generate-then-create attempts per shorten call.
    /// Every shorten call makes at least one.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: NonZeroUsize,
    /// Deadline applied to every repository call.
    #[builder(default = DEFAULT_STORAGE_TIMEOUT)]
    pub storage_timeout: Duration,
}
