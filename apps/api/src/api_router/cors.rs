use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use fieldgate_core::AppError;
use tower_http::cors::CorsLayer;

pub(super) fn build_cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|error| {
        AppError::Configuration(format!("invalid CORS_ALLOWED_ORIGIN: {error}"))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]))
}
