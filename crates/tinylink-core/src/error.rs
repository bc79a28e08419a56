use thiserror::Error;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors reported by a [`Repository`](crate::Repository) backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    DuplicateCode(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage operation cancelled: {0}")]
    Cancelled(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// The coarse classification of a [`ServiceError`].
///
/// Transports map kinds onto their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    GenerationExhausted,
    NotFound,
    Timeout,
    Cancelled,
    RateLimited,
    Unavailable,
    Internal,
}

/// Errors surfaced by the shortener and redirector services.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("invalid expiration: {0}")]
    InvalidExpiration(String),
    #[error("no unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("operation timed out: {0}")]
    Timeout(String),
    #[error("operation cancelled: {0}")]
    Cancelled(String),
    #[error("rate limit exceeded for {0}")]
    RateLimited(&'static str),
    #[error("storage error: {0}")]
    Storage(StorageError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidUrl(_)
            | ServiceError::InvalidShortCode(_)
            | ServiceError::InvalidExpiration(_) => ErrorKind::InvalidInput,
            ServiceError::GenerationExhausted { .. } => ErrorKind::GenerationExhausted,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Timeout(_) => ErrorKind::Timeout,
            ServiceError::Cancelled(_) => ErrorKind::Cancelled,
            ServiceError::RateLimited(_) => ErrorKind::RateLimited,
            ServiceError::Storage(StorageError::Unavailable(_)) => ErrorKind::Unavailable,
            ServiceError::Storage(_) => ErrorKind::Internal,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Timeout(message) => Self::Timeout(message),
            StorageError::Cancelled(message) => Self::Cancelled(message),
            other => Self::Storage(other),
        }
    }
}
