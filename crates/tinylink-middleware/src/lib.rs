//! Decorators for the shortener and redirector services.
//!
//! Each decorator implements the same trait as the service it wraps, so they
//! stack freely. The server composes them as `Logged(RateLimited(service))`
//! so rejected calls are logged too.

pub mod logging;
pub mod rate_limit;

pub use logging::Logged;
pub use rate_limit::{RateLimitSettings, RateLimited};
