use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let schema_loaded = state
        .field_path_collector
        .is_schema_loaded()
        .await
        .unwrap_or_else(|error| {
            warn!(error = %error, "schema provider check failed");
            false
        });

    let (http_status, status) = if schema_loaded {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            schema_loaded,
            permission_strategy: state.permission_resolver.strategy_name(),
        }),
    )
}
