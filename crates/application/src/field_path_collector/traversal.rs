use fieldgate_domain::{
    FieldPathSet, SchemaSnapshot, TraversalConfig, TypeDescriptor, join_field_path,
};
use tracing::{debug, warn};

/// Collects every field path reachable from `entity_name` within the depth bound.
///
/// Termination over cyclic graphs relies on the depth ceiling alone.
pub(crate) fn collect_field_paths(
    snapshot: &SchemaSnapshot,
    entity_name: &str,
    config: &TraversalConfig,
) -> FieldPathSet {
    let mut paths = FieldPathSet::new();

    if !config.allows(entity_name) {
        if config.debug_enabled() {
            warn!(entity = %entity_name, "entity is not an allowed type, skipping");
        }
        return paths;
    }

    let Some(root) = snapshot.object_type(entity_name) else {
        if config.debug_enabled() {
            warn!(
                entity = %entity_name,
                "entity is missing from the schema or is not an object type"
            );
        }
        return paths;
    };

    visit(snapshot, config, root, "", 1, &mut paths);
    paths
}

fn visit(
    snapshot: &SchemaSnapshot,
    config: &TraversalConfig,
    object_type: &TypeDescriptor,
    prefix: &str,
    depth: u32,
    paths: &mut FieldPathSet,
) {
    if depth > config.max_depth() {
        return;
    }

    if config.debug_enabled() {
        debug!(
            depth,
            object_type = %object_type.name(),
            field_count = object_type.fields().len(),
            "visiting object type"
        );
    }

    for field in object_type.fields() {
        let field_path = join_field_path(prefix, field.name());

        if config.debug_enabled() {
            debug!(depth, field_path = %field_path, "collected field path");
        }

        if depth < config.max_depth()
            && config.allows(field.named_type())
            && let Some(child) = snapshot.object_type(field.named_type())
        {
            visit(snapshot, config, child, &field_path, depth + 1, paths);
        }

        paths.insert(field_path);
    }
}
