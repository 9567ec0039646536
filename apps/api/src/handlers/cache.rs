use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn clear_field_path_cache_handler(
    State(state): State<AppState>,
) -> ApiResult<StatusCode> {
    state.field_path_collector.clear_cache().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn invalidate_entity_field_paths_handler(
    State(state): State<AppState>,
    Path(entity_name): Path<String>,
) -> ApiResult<StatusCode> {
    state.field_path_collector.invalidate(&entity_name).await?;
    Ok(StatusCode::NO_CONTENT)
}
