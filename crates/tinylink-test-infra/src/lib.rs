//! Disposable backing services for integration tests.

pub mod error;
pub mod mongo;
pub mod redis;

pub use error::{Result, TestInfraError};
pub use mongo::MongoServer;
pub use redis::RedisServer;
