//! Repository backends.
//!
//! Every backend implements [`tinylink_core::Repository`] with an atomic
//! insert-if-absent `create` and a point-lookup `find_by_code`. The backend
//! is chosen once at startup and stays fixed for the process lifetime.

pub mod backend;
pub mod memory;
pub mod mongo;
pub mod redis;

pub use backend::StorageBackend;
pub use memory::InMemoryRepository;
pub use mongo::{MongoRepository, MongoSettings};
pub use redis::{RedisMode, RedisRepository, RedisSettings};
pub use tinylink_core::{Repository, StorageError};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;
