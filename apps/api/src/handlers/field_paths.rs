use axum::Json;
use axum::extract::{Path, State};

use crate::dto::{FieldPathsResponse, WarmUpRequest, WarmUpResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn field_paths_handler(
    State(state): State<AppState>,
    Path(entity_name): Path<String>,
) -> ApiResult<Json<FieldPathsResponse>> {
    let field_paths = state
        .field_path_collector
        .field_paths(&entity_name)
        .await?
        .into_inner()
        .into_iter()
        .collect();

    Ok(Json(FieldPathsResponse {
        entity_name,
        field_paths,
    }))
}

pub async fn warm_up_handler(
    State(state): State<AppState>,
    Json(payload): Json<WarmUpRequest>,
) -> ApiResult<Json<WarmUpResponse>> {
    state
        .field_path_collector
        .warm_up(&payload.entity_names)
        .await?;

    Ok(Json(WarmUpResponse {
        warmed_entities: payload.entity_names,
    }))
}
