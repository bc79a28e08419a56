//! Redirector service library.
//!
//! [`RedirectorService`] turns a short code back into the URL it was
//! created for. It reads straight from the repository on every call.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tinylink_core::{Redirect, Redirector, Repository, ShortCode};
//! use tinylink_redirector::RedirectorService;
//! use tinylink_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = Arc::new(InMemoryRepository::new());
//! let code = ShortCode::new("abc123")?;
//! repository
//!     .create(&Redirect::new(code, "https://example.com"))
//!     .await?;
//!
//! let service = RedirectorService::with_shared(repository, Duration::from_secs(5));
//! assert_eq!(service.resolve("abc123").await?, "https://example.com");
//! # Ok(())
//! # }
//! ```

pub mod service;

pub use service::RedirectorService;
