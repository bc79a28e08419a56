//! URL shortener service implementation.
//!
//! Validates the target, draws candidate codes from a generator, and leaves
//! the uniqueness decision to the repository's atomic insert.

pub mod service;

pub use service::ShortenerService;
