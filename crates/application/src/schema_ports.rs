use std::sync::Arc;

use async_trait::async_trait;
use fieldgate_core::AppResult;
use fieldgate_domain::{FieldPathSet, SchemaSnapshot};

/// Source of the typed object graph that field paths are discovered from.
#[async_trait]
pub trait SchemaGraphProvider: Send + Sync {
    /// Returns the current snapshot, or `None` while no schema has been loaded.
    async fn snapshot(&self) -> AppResult<Option<Arc<SchemaSnapshot>>>;
}

/// Memoization port for discovered field paths, keyed by entity name.
#[async_trait]
pub trait FieldPathCache: Send + Sync {
    /// Returns the cached paths for one entity.
    async fn get_field_paths(&self, entity_name: &str) -> AppResult<Option<FieldPathSet>>;

    /// Stores the paths for one entity, replacing any previous value.
    async fn set_field_paths(&self, entity_name: &str, paths: FieldPathSet) -> AppResult<()>;

    /// Drops the cached paths for one entity.
    async fn invalidate_entity(&self, entity_name: &str) -> AppResult<()>;

    /// Drops every cached entry.
    async fn clear(&self) -> AppResult<()>;
}
