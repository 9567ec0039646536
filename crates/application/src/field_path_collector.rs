use std::sync::Arc;

use fieldgate_core::{AppError, AppResult};
use fieldgate_domain::{FieldPathSet, SchemaSnapshot, TraversalConfig, TraversalConfigOverrides};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::schema_ports::{FieldPathCache, SchemaGraphProvider};

mod traversal;

#[cfg(test)]
mod tests;

/// Application service discovering and memoizing entity field paths.
///
/// Reconfiguring does not touch cached results. Callers that need fresh
/// paths after [`FieldPathCollector::configure`] must clear the cache.
///
/// Every invalidation advances a cache epoch. Paths computed under an older
/// epoch are returned to their caller but never stored.
#[derive(Clone)]
pub struct FieldPathCollector {
    schema_provider: Arc<dyn SchemaGraphProvider>,
    cache: Arc<dyn FieldPathCache>,
    config: Arc<RwLock<TraversalConfig>>,
    cache_epoch: Arc<RwLock<u64>>,
}

impl FieldPathCollector {
    /// Creates a collector over a schema provider and an explicit cache.
    #[must_use]
    pub fn new(
        schema_provider: Arc<dyn SchemaGraphProvider>,
        cache: Arc<dyn FieldPathCache>,
        config: TraversalConfig,
    ) -> Self {
        Self {
            schema_provider,
            cache,
            config: Arc::new(RwLock::new(config)),
            cache_epoch: Arc::new(RwLock::new(0)),
        }
    }

    /// Returns a copy of the active traversal configuration.
    pub async fn config(&self) -> TraversalConfig {
        self.config.read().await.clone()
    }

    /// Applies configuration overrides atomically and returns the result.
    pub async fn configure(
        &self,
        overrides: TraversalConfigOverrides,
    ) -> AppResult<TraversalConfig> {
        let mut config = self.config.write().await;
        let updated = config.with_overrides(overrides)?;
        *config = updated.clone();
        drop(config);

        if updated.debug_enabled() {
            info!(
                max_depth = updated.max_depth(),
                allowed_types = ?updated.allowed_types(),
                "field path traversal configured"
            );
        }

        Ok(updated)
    }

    /// Computes and caches field paths for every entity eagerly.
    pub async fn warm_up(&self, entity_names: &[String]) -> AppResult<()> {
        let epoch = self.current_epoch().await;
        let snapshot = self.require_snapshot().await?;
        let config = self.config().await;

        if config.debug_enabled() {
            info!(
                entities = ?entity_names,
                max_depth = config.max_depth(),
                "warming up field path cache"
            );
        }

        for entity_name in entity_names {
            let paths = traversal::collect_field_paths(&snapshot, entity_name, &config);
            if config.debug_enabled() {
                debug!(
                    entity = %entity_name,
                    path_count = paths.len(),
                    "preloaded entity field paths"
                );
            }
            self.store_if_current(epoch, entity_name, paths).await?;
        }

        Ok(())
    }

    /// Returns the field paths of one entity, computing them on a cache miss.
    ///
    /// Unknown, non-object and non-allowed entities yield an empty set.
    pub async fn field_paths(&self, entity_name: &str) -> AppResult<FieldPathSet> {
        if let Some(cached) = self.cache.get_field_paths(entity_name).await? {
            return Ok(cached);
        }

        let epoch = self.current_epoch().await;
        let snapshot = self.require_snapshot().await?;
        let config = self.config().await;
        let paths = traversal::collect_field_paths(&snapshot, entity_name, &config);
        self.store_if_current(epoch, entity_name, paths.clone()).await?;

        Ok(paths)
    }

    /// Returns whether the schema provider currently has a snapshot.
    pub async fn is_schema_loaded(&self) -> AppResult<bool> {
        Ok(self.schema_provider.snapshot().await?.is_some())
    }

    /// Drops cached paths for one entity.
    pub async fn invalidate(&self, entity_name: &str) -> AppResult<()> {
        let mut epoch = self.cache_epoch.write().await;
        *epoch = epoch.wrapping_add(1);
        self.cache.invalidate_entity(entity_name).await
    }

    /// Drops every cached entity.
    pub async fn clear_cache(&self) -> AppResult<()> {
        let mut epoch = self.cache_epoch.write().await;
        *epoch = epoch.wrapping_add(1);
        self.cache.clear().await
    }

    async fn current_epoch(&self) -> u64 {
        *self.cache_epoch.read().await
    }

    // The read guard is held across the write so an invalidation waits for it.
    async fn store_if_current(
        &self,
        epoch: u64,
        entity_name: &str,
        paths: FieldPathSet,
    ) -> AppResult<()> {
        let current = self.cache_epoch.read().await;
        if *current != epoch {
            debug!(
                entity = %entity_name,
                "cache invalidated during computation; result not stored"
            );
            return Ok(());
        }

        self.cache.set_field_paths(entity_name, paths).await
    }

    async fn require_snapshot(&self) -> AppResult<Arc<SchemaSnapshot>> {
        self.schema_provider.snapshot().await?.ok_or_else(|| {
            AppError::SchemaUnavailable(
                "schema snapshot has not been loaded yet".to_owned(),
            )
        })
    }
}
