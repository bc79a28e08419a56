//! Core types and traits for the tinylink URL shortener.
//!
//! This crate provides the shared model, the storage contract, and the
//! service traits used by the shortener, the redirector, the middleware
//! wrappers, and the transports.

pub mod deadline;
pub mod error;
pub mod redirect;
pub mod redirector;
pub mod repository;
pub mod settings;
pub mod shortcode;
pub mod shortener;

pub use deadline::with_deadline;
pub use error::{ErrorKind, ServiceError, StorageError};
pub use redirect::Redirect;
pub use redirector::Redirector;
pub use repository::Repository;
pub use settings::ServiceSettings;
pub use shortcode::ShortCode;
pub use shortener::{ExpirationPolicy, ShortLink, ShortenParams, Shortener};
