use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tinylink_core::repository::Repository;
use tinylink_core::{Redirect, ShortCode, StorageError};
use tracing::trace;

use crate::Result;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Inserts go through the entry API, which holds
/// the shard lock across the existence check and the write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<ShortCode, Redirect>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create(&self, redirect: &Redirect) -> Result<()> {
        match self.storage.entry(redirect.code.clone()) {
            Entry::Occupied(_) => {
                trace!(code = %redirect.code, "short code already taken");
                Err(StorageError::DuplicateCode(redirect.code.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(redirect.clone());
                Ok(())
            }
        }
    }

    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<Redirect>> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }
}
