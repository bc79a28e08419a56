//! Protobuf schema for the tinylink RPC transport.
//!
//! Generated types live in [`v1`]; this module adds the conversions between
//! wire messages and the core model.

use tinylink_core::{ExpirationPolicy, ServiceError, ShortLink, ShortenParams};

pub mod v1 {
    tonic::include_proto!("tinylink.v1");
}

impl TryFrom<v1::ShortenRequest> for ShortenParams {
    type Error = ServiceError;

    fn try_from(request: v1::ShortenRequest) -> Result<Self, Self::Error> {
        let expiration = ExpirationPolicy::from_ttl_seconds(request.ttl_seconds)?;
        Ok(ShortenParams::new(request.url).with_expiration(expiration))
    }
}

impl From<ShortLink> for v1::ShortenResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            code: link.code.to_string(),
            short_url: link.short_url,
        }
    }
}

impl From<String> for v1::ResolveResponse {
    fn from(url: String) -> Self {
        Self { url }
    }
}
