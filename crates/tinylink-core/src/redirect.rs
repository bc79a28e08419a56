use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A persisted code to URL mapping.
///
/// Redirects are write-once: nothing in the core mutates a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Redirect {
    /// The short code, unique within a storage namespace.
    pub code: ShortCode,
    /// The absolute URL the code resolves to.
    pub target_url: String,
    pub created_at: Timestamp,
    /// Advisory expiry. `None` means the mapping is permanent.
    pub expires_at: Option<Timestamp>,
}

impl Redirect {
    /// Creates a redirect stamped with the current time.
    pub fn new(code: ShortCode, target_url: impl Into<String>) -> Self {
        Self {
            code,
            target_url: target_url.into(),
            created_at: Timestamp::now(),
            expires_at: None,
        }
    }

    pub fn with_expires_at(mut self, expires_at: Option<Timestamp>) -> Self {
        self.expires_at = expires_at;
        self
    }
}
