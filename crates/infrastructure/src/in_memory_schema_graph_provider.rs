use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use fieldgate_application::SchemaGraphProvider;
use fieldgate_core::{AppError, AppResult};
use fieldgate_domain::SchemaSnapshot;
use tokio::sync::RwLock;
use tracing::info;

/// Schema provider holding a snapshot loaded in process.
///
/// Starts empty until [`InMemorySchemaGraphProvider::load`] is called.
#[derive(Debug, Default)]
pub struct InMemorySchemaGraphProvider {
    snapshot: RwLock<Option<Arc<SchemaSnapshot>>>,
}

impl InMemorySchemaGraphProvider {
    /// Creates a provider with no schema loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with a snapshot already loaded.
    #[must_use]
    pub fn with_snapshot(snapshot: SchemaSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(Arc::new(snapshot))),
        }
    }

    /// Creates a provider from a JSON snapshot document on disk.
    pub async fn from_json_file(path: &Path) -> AppResult<Self> {
        Ok(Self::with_snapshot(read_snapshot_file(path).await?))
    }

    /// Re-reads a JSON snapshot document and installs it.
    ///
    /// A missing or invalid document leaves the current snapshot in place.
    pub async fn reload_from_json_file(&self, path: &Path) -> AppResult<Arc<SchemaSnapshot>> {
        let snapshot = Arc::new(read_snapshot_file(path).await?);
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Installs a new snapshot, replacing the current one.
    pub async fn load(&self, snapshot: SchemaSnapshot) {
        *self.snapshot.write().await = Some(Arc::new(snapshot));
    }
}

async fn read_snapshot_file(path: &Path) -> AppResult<SchemaSnapshot> {
    let bytes = tokio::fs::read(path).await.map_err(|error| {
        AppError::Internal(format!(
            "failed to read schema snapshot '{}': {error}",
            path.display()
        ))
    })?;
    let snapshot = SchemaSnapshot::from_json_slice(&bytes)?;

    info!(
        path = %path.display(),
        type_count = snapshot.type_count(),
        "schema snapshot loaded from file"
    );

    Ok(snapshot)
}

#[async_trait]
impl SchemaGraphProvider for InMemorySchemaGraphProvider {
    async fn snapshot(&self) -> AppResult<Option<Arc<SchemaSnapshot>>> {
        Ok(self.snapshot.read().await.clone())
    }
}
