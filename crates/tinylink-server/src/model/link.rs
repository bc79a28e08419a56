use serde::{Deserialize, Serialize};
use tinylink_core::{ExpirationPolicy, ServiceError, ShortLink, ShortenParams};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

impl TryFrom<ShortenRequest> for ShortenParams {
    type Error = ServiceError;

    fn try_from(request: ShortenRequest) -> Result<Self, Self::Error> {
        let expiration = ExpirationPolicy::from_ttl_seconds(request.ttl_seconds)?;
        Ok(ShortenParams::new(request.url).with_expiration(expiration))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
}

impl From<ShortLink> for ShortenResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            code: link.code.to_string(),
            short_url: link.short_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
