use axum::Json;
use axum::extract::{Path, State};

use crate::dto::{ViewableFieldsRequest, ViewableFieldsResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn viewable_fields_handler(
    State(state): State<AppState>,
    Path(entity_name): Path<String>,
    Json(payload): Json<ViewableFieldsRequest>,
) -> ApiResult<Json<ViewableFieldsResponse>> {
    let viewable_fields = state
        .permission_resolver
        .viewable_fields(&payload.group_ids, &entity_name)
        .await?
        .into_inner()
        .into_iter()
        .collect();

    Ok(Json(ViewableFieldsResponse {
        entity_name,
        strategy: state.permission_resolver.strategy_name(),
        viewable_fields,
    }))
}
