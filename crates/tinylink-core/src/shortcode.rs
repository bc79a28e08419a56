use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A short code identifying a stored redirect.
///
/// Short codes must be 1-64 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(SmolStr);

pub const MIN_LENGTH: usize = 1;
pub const MAX_LENGTH: usize = 64;

/// Returns `true` if `c` may appear in a short code.
pub fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Valid codes are 1-64 characters and contain only `[a-zA-Z0-9_-]`.
    pub fn new(code: impl AsRef<str>) -> std::result::Result<Self, ServiceError> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. generators drawing from a validated alphabet).
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code))
    }

    /// Generates the full short link based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn validate(code: &str) -> std::result::Result<(), ServiceError> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(ServiceError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(is_code_char) {
            return Err(ServiceError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("a").is_ok());
        assert!(ShortCode::new("Abc-123_xyz").is_ok());
        assert!(ShortCode::new("a".repeat(64)).is_ok());
    }

    #[test]
    fn empty_or_too_long() {
        assert!(ShortCode::new("").is_err());
        assert!(ShortCode::new("a".repeat(65)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("abc def").is_err());
        assert!(ShortCode::new("abc/def").is_err());
        assert!(ShortCode::new("abc?def").is_err());
        assert!(ShortCode::new("ünï").is_err());
    }

    #[test]
    fn to_url_joins_with_single_slash() {
        let code = ShortCode::new("abc123").unwrap();
        assert_eq!(code.to_url("https://tiny.link"), "https://tiny.link/abc123");
        assert_eq!(code.to_url("https://tiny.link/"), "https://tiny.link/abc123");
        assert_eq!(
            code.to_url("https://tiny.link/s/"),
            "https://tiny.link/s/abc123"
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let code = ShortCode::new("abc123").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"abc123\"");

        let back: ShortCode = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(back, code);
    }
}
