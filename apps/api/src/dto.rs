use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub schema_loaded: bool,
    pub permission_strategy: &'static str,
}

/// Discovered field paths of one entity.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/field-paths-response.ts"
)]
pub struct FieldPathsResponse {
    pub entity_name: String,
    pub field_paths: Vec<String>,
}

/// Incoming payload for a viewable-fields lookup.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/viewable-fields-request.ts"
)]
pub struct ViewableFieldsRequest {
    pub group_ids: Vec<String>,
}

/// Union of field paths the requested groups may view.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/viewable-fields-response.ts"
)]
pub struct ViewableFieldsResponse {
    pub entity_name: String,
    pub strategy: &'static str,
    pub viewable_fields: Vec<String>,
}

/// Active traversal configuration.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/traversal-config-response.ts"
)]
pub struct TraversalConfigResponse {
    pub max_depth: u32,
    pub allowed_types: Vec<String>,
    pub debug_enabled: bool,
}

/// Partial traversal configuration update; omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-traversal-config-request.ts"
)]
pub struct UpdateTraversalConfigRequest {
    #[serde(default)]
    pub max_depth: Option<u32>,
    #[serde(default)]
    pub allowed_types: Option<Vec<String>>,
    #[serde(default)]
    pub debug_enabled: Option<bool>,
}

/// Entities to precompute.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/warm-up-request.ts"
)]
pub struct WarmUpRequest {
    pub entity_names: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/warm-up-response.ts"
)]
pub struct WarmUpResponse {
    pub warmed_entities: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/schema-reload-response.ts"
)]
pub struct SchemaReloadResponse {
    pub type_count: usize,
}
