use std::collections::HashMap;

use async_trait::async_trait;
use fieldgate_application::FieldPathCache;
use fieldgate_core::AppResult;
use fieldgate_domain::FieldPathSet;
use tokio::sync::RwLock;

/// In-memory cache adapter for discovered field paths.
///
/// Entries live until invalidated; the cache never outlives the process.
#[derive(Debug, Default)]
pub struct InMemoryFieldPathCache {
    entries: RwLock<HashMap<String, FieldPathSet>>,
}

impl InMemoryFieldPathCache {
    /// Creates an empty field path cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entities.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns whether no entity is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl FieldPathCache for InMemoryFieldPathCache {
    async fn get_field_paths(&self, entity_name: &str) -> AppResult<Option<FieldPathSet>> {
        Ok(self.entries.read().await.get(entity_name).cloned())
    }

    async fn set_field_paths(&self, entity_name: &str, paths: FieldPathSet) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert(entity_name.to_owned(), paths);

        Ok(())
    }

    async fn invalidate_entity(&self, entity_name: &str) -> AppResult<()> {
        self.entries.write().await.remove(entity_name);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}
