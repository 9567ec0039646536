use fieldgate_domain::{TraversalConfig, TraversalConfigOverrides};

use super::{TraversalConfigResponse, UpdateTraversalConfigRequest};

impl From<TraversalConfig> for TraversalConfigResponse {
    fn from(value: TraversalConfig) -> Self {
        Self {
            max_depth: value.max_depth(),
            allowed_types: value.allowed_types().iter().cloned().collect(),
            debug_enabled: value.debug_enabled(),
        }
    }
}

impl From<UpdateTraversalConfigRequest> for TraversalConfigOverrides {
    fn from(value: UpdateTraversalConfigRequest) -> Self {
        Self {
            max_depth: value.max_depth,
            allowed_types: value.allowed_types,
            debug_enabled: value.debug_enabled,
        }
    }
}
