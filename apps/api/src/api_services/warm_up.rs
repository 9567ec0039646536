use tracing::{info, warn};

use crate::state::AppState;

/// Precomputes configured entities at startup.
///
/// Failures are logged and leave the cache to fill lazily.
pub async fn warm_up_field_paths(app_state: &AppState, entity_names: &[String]) {
    if entity_names.is_empty() {
        return;
    }

    match app_state.field_path_collector.warm_up(entity_names).await {
        Ok(()) => info!(entities = ?entity_names, "field path cache warmed up"),
        Err(error) => warn!(error = %error, "skipping field path warm-up"),
    }
}
