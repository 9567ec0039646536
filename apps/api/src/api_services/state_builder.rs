use std::sync::Arc;

use fieldgate_application::{
    FieldPathCollector, LocalPermissionAuthority, PermissionResolver, PermissionStrategy,
    RemotePermissionAuthority,
};
use fieldgate_core::AppError;
use fieldgate_infrastructure::{
    HttpPermissionAuthority, HttpSchemaGraphProvider, InMemoryFieldPathCache,
    InMemorySchemaGraphProvider, PostgresPermissionAuthority,
};
use tracing::{info, warn};

use crate::api_config::{ApiConfig, SchemaSourceConfig};
use crate::state::{AppState, SchemaSource};

use super::database::connect_and_migrate;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let schema_source = build_schema_source(&config.schema_source).await?;
    let field_path_collector = FieldPathCollector::new(
        schema_source.provider(),
        Arc::new(InMemoryFieldPathCache::new()),
        config.traversal.clone(),
    );

    let strategy = build_permission_strategy(config).await?;
    info!(strategy = strategy.as_str(), "permission strategy selected");

    Ok(AppState {
        field_path_collector,
        permission_resolver: PermissionResolver::new(strategy),
        schema_source,
    })
}

async fn build_schema_source(config: &SchemaSourceConfig) -> Result<SchemaSource, AppError> {
    match config {
        SchemaSourceConfig::File(path) => Ok(SchemaSource::File {
            provider: Arc::new(InMemorySchemaGraphProvider::from_json_file(path).await?),
            path: path.clone(),
        }),
        SchemaSourceConfig::Url { url, timeout } => Ok(SchemaSource::Remote(Arc::new(
            HttpSchemaGraphProvider::new(url.clone(), *timeout)?,
        ))),
    }
}

async fn build_permission_strategy(config: &ApiConfig) -> Result<PermissionStrategy, AppError> {
    let remote = config
        .permission_authority
        .clone()
        .map(HttpPermissionAuthority::new)
        .transpose()?
        .map(|authority| Arc::new(authority) as Arc<dyn RemotePermissionAuthority>);

    let local = match (&remote, config.database_url.as_deref()) {
        (None, Some(database_url)) => {
            let pool = connect_and_migrate(database_url).await?;
            Some(Arc::new(PostgresPermissionAuthority::new(pool)) as Arc<dyn LocalPermissionAuthority>)
        }
        (Some(_), Some(_)) => {
            warn!("DATABASE_URL is ignored while PERMISSION_AUTHORITY_URL is set");
            None
        }
        (_, None) => None,
    };

    PermissionStrategy::from_authorities(remote, local)
}
