use std::fmt::{Display, Formatter};
use std::sync::Arc;

use tinylink_core::Repository;
use tracing::info;

use crate::{
    InMemoryRepository, MongoRepository, MongoSettings, RedisMode, RedisRepository, RedisSettings,
    Result,
};

/// Which store holds the redirects, with the settings to reach it.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    Memory,
    Redis(RedisSettings),
    Mongo(MongoSettings),
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Redis(settings) => match settings.mode() {
                RedisMode::Single => write!(f, "redis"),
                RedisMode::Cluster => write!(f, "redis-cluster"),
            },
            StorageBackend::Mongo(_) => write!(f, "mongo"),
        }
    }
}

impl StorageBackend {
    /// Connects to the selected store.
    pub async fn connect(&self) -> Result<Arc<dyn Repository>> {
        let repository: Arc<dyn Repository> = match self {
            StorageBackend::Memory => Arc::new(InMemoryRepository::new()),
            StorageBackend::Redis(settings) => match settings.mode() {
                RedisMode::Single => Arc::new(RedisRepository::connect(settings).await?),
                RedisMode::Cluster => Arc::new(RedisRepository::connect_cluster(settings).await?),
            },
            StorageBackend::Mongo(settings) => Arc::new(MongoRepository::connect(settings).await?),
        };

        info!(backend = %self, "storage backend ready");
        Ok(repository)
    }
}
