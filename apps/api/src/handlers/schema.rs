use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::dto::SchemaReloadResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Reloads the schema snapshot and drops every cached field path.
pub async fn reload_schema_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<SchemaReloadResponse>> {
    let snapshot = state.schema_source.reload().await?;
    state.field_path_collector.clear_cache().await?;

    info!(type_count = snapshot.type_count(), "schema snapshot reloaded");

    Ok(Json(SchemaReloadResponse {
        type_count: snapshot.type_count(),
    }))
}
