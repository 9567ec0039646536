use axum::Router;
use axum::routing::{delete, get, post};
use fieldgate_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

pub fn build_router(
    app_state: AppState,
    cors_allowed_origin: Option<&str>,
) -> Result<Router, AppError> {
    let field_path_routes = Router::new()
        .route(
            "/api/entities/{entity_name}/field-paths",
            get(handlers::field_paths::field_paths_handler),
        )
        .route(
            "/api/field-paths/warm-up",
            post(handlers::field_paths::warm_up_handler),
        )
        .route(
            "/api/field-paths/cache",
            delete(handlers::cache::clear_field_path_cache_handler),
        )
        .route(
            "/api/field-paths/cache/{entity_name}",
            delete(handlers::cache::invalidate_entity_field_paths_handler),
        )
        .route(
            "/api/traversal-config",
            get(handlers::traversal_config::traversal_config_handler)
                .put(handlers::traversal_config::update_traversal_config_handler),
        )
        .route(
            "/api/schema/reload",
            post(handlers::schema::reload_schema_handler),
        );

    let permission_routes = Router::new().route(
        "/api/entities/{entity_name}/viewable-fields",
        post(handlers::permissions::viewable_fields_handler),
    );

    let router = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(field_path_routes)
        .merge(permission_routes)
        .layer(TraceLayer::new_for_http());

    let router = match cors_allowed_origin {
        Some(origin) => router.layer(cors::build_cors_layer(origin)?),
        None => router,
    };

    Ok(router.with_state(app_state))
}
