use std::path::PathBuf;
use std::sync::Arc;

use fieldgate_application::{FieldPathCollector, PermissionResolver, SchemaGraphProvider};
use fieldgate_core::AppResult;
use fieldgate_domain::SchemaSnapshot;
use fieldgate_infrastructure::{HttpSchemaGraphProvider, InMemorySchemaGraphProvider};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub field_path_collector: FieldPathCollector,
    pub permission_resolver: PermissionResolver,
    pub schema_source: SchemaSource,
}

/// Schema provider wiring, kept so the snapshot can be reloaded at runtime.
#[derive(Clone)]
pub enum SchemaSource {
    File {
        provider: Arc<InMemorySchemaGraphProvider>,
        path: PathBuf,
    },
    Remote(Arc<HttpSchemaGraphProvider>),
}

impl SchemaSource {
    pub fn provider(&self) -> Arc<dyn SchemaGraphProvider> {
        match self {
            Self::File { provider, .. } => provider.clone(),
            Self::Remote(provider) => provider.clone(),
        }
    }

    /// Loads the snapshot again from its origin.
    pub async fn reload(&self) -> AppResult<Arc<SchemaSnapshot>> {
        match self {
            Self::File { provider, path } => provider.reload_from_json_file(path).await,
            Self::Remote(provider) => provider.refresh().await,
        }
    }
}
