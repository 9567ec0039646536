use axum::Json;
use axum::extract::State;

use crate::dto::{TraversalConfigResponse, UpdateTraversalConfigRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn traversal_config_handler(
    State(state): State<AppState>,
) -> Json<TraversalConfigResponse> {
    Json(TraversalConfigResponse::from(
        state.field_path_collector.config().await,
    ))
}

/// Applies overrides without touching cached field paths.
pub async fn update_traversal_config_handler(
    State(state): State<AppState>,
    Json(payload): Json<UpdateTraversalConfigRequest>,
) -> ApiResult<Json<TraversalConfigResponse>> {
    let config = state
        .field_path_collector
        .configure(payload.into())
        .await?;

    Ok(Json(TraversalConfigResponse::from(config)))
}
