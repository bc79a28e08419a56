mod link;

pub use link::{ErrorResponse, HealthResponse, ShortenRequest, ShortenResponse};
