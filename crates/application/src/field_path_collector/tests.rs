use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use fieldgate_core::{AppError, AppResult};
use fieldgate_domain::{
    FieldDescriptor, FieldPathSet, SchemaSnapshot, TraversalConfig, TraversalConfigOverrides,
    TypeDescriptor, TypeRef,
};
use proptest::prelude::*;
use tokio::sync::{Mutex, Notify};

use crate::{FieldPathCache, SchemaGraphProvider};

use super::FieldPathCollector;
use super::traversal::collect_field_paths;

struct FakeSchemaProvider {
    snapshot: Option<Arc<SchemaSnapshot>>,
    fetches: AtomicUsize,
}

impl FakeSchemaProvider {
    fn loaded(snapshot: SchemaSnapshot) -> Self {
        Self {
            snapshot: Some(Arc::new(snapshot)),
            fetches: AtomicUsize::new(0),
        }
    }

    fn unloaded() -> Self {
        Self {
            snapshot: None,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaGraphProvider for FakeSchemaProvider {
    async fn snapshot(&self) -> AppResult<Option<Arc<SchemaSnapshot>>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot.clone())
    }
}

#[derive(Default)]
struct FakeFieldPathCache {
    entries: Mutex<HashMap<String, FieldPathSet>>,
}

#[async_trait]
impl FieldPathCache for FakeFieldPathCache {
    async fn get_field_paths(&self, entity_name: &str) -> AppResult<Option<FieldPathSet>> {
        Ok(self.entries.lock().await.get(entity_name).cloned())
    }

    async fn set_field_paths(&self, entity_name: &str, paths: FieldPathSet) -> AppResult<()> {
        self.entries
            .lock()
            .await
            .insert(entity_name.to_owned(), paths);
        Ok(())
    }

    async fn invalidate_entity(&self, entity_name: &str) -> AppResult<()> {
        self.entries.lock().await.remove(entity_name);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

struct SwappableSchemaProvider {
    snapshot: Mutex<Arc<SchemaSnapshot>>,
}

impl SwappableSchemaProvider {
    fn new(snapshot: SchemaSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Arc::new(snapshot)),
        }
    }

    async fn replace(&self, snapshot: SchemaSnapshot) {
        *self.snapshot.lock().await = Arc::new(snapshot);
    }
}

#[async_trait]
impl SchemaGraphProvider for SwappableSchemaProvider {
    async fn snapshot(&self) -> AppResult<Option<Arc<SchemaSnapshot>>> {
        Ok(Some(self.snapshot.lock().await.clone()))
    }
}

/// Cache whose next write parks until released.
#[derive(Default)]
struct GatedFieldPathCache {
    inner: FakeFieldPathCache,
    armed: AtomicBool,
    write_started: Notify,
    release_write: Notify,
}

impl GatedFieldPathCache {
    fn armed() -> Self {
        let cache = Self::default();
        cache.armed.store(true, Ordering::SeqCst);
        cache
    }
}

#[async_trait]
impl FieldPathCache for GatedFieldPathCache {
    async fn get_field_paths(&self, entity_name: &str) -> AppResult<Option<FieldPathSet>> {
        self.inner.get_field_paths(entity_name).await
    }

    async fn set_field_paths(&self, entity_name: &str, paths: FieldPathSet) -> AppResult<()> {
        if self.armed.swap(false, Ordering::SeqCst) {
            self.write_started.notify_one();
            self.release_write.notified().await;
        }
        self.inner.set_field_paths(entity_name, paths).await
    }

    async fn invalidate_entity(&self, entity_name: &str) -> AppResult<()> {
        self.inner.invalidate_entity(entity_name).await
    }

    async fn clear(&self) -> AppResult<()> {
        self.inner.clear().await
    }
}

fn field(name: &str, type_ref: TypeRef) -> FieldDescriptor {
    FieldDescriptor::new(name, type_ref).unwrap_or_else(|_| unreachable!())
}

fn object(name: &str, fields: Vec<FieldDescriptor>) -> TypeDescriptor {
    TypeDescriptor::object(name, fields).unwrap_or_else(|_| unreachable!())
}

fn scalar(name: &str) -> TypeDescriptor {
    TypeDescriptor::scalar(name).unwrap_or_else(|_| unreachable!())
}

fn user_schema() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        object(
            "User",
            vec![
                field("id", TypeRef::named("ID").non_null()),
                field("email", TypeRef::named("String")),
                field("authData", TypeRef::named("AuthData")),
                field("friends", TypeRef::named("User").non_null().list()),
                field("address", TypeRef::named("Address")),
            ],
        ),
        object(
            "AuthData",
            vec![
                field("email", TypeRef::named("String")),
                field("token", TypeRef::named("Token")),
            ],
        ),
        object(
            "Token",
            vec![
                field("value", TypeRef::named("String")),
                field("expiresAt", TypeRef::named("String")),
            ],
        ),
        object("Address", vec![field("street", TypeRef::named("String"))]),
        scalar("ID"),
        scalar("String"),
    ])
    .unwrap_or_else(|_| unreachable!())
}

fn node_schema() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        object(
            "Node",
            vec![
                field("id", TypeRef::named("ID")),
                field("parent", TypeRef::named("Node")),
                field("children", TypeRef::named("Node").list().non_null()),
            ],
        ),
        scalar("ID"),
    ])
    .unwrap_or_else(|_| unreachable!())
}

fn renamed_user_schema() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        object("User", vec![field("renamed", TypeRef::named("String"))]),
        scalar("String"),
    ])
    .unwrap_or_else(|_| unreachable!())
}

fn config(max_depth: u32, allowed_types: &[&str]) -> TraversalConfig {
    TraversalConfig::new(max_depth, allowed_types.iter().copied(), false)
        .unwrap_or_else(|_| unreachable!())
}

fn collector(
    provider: Arc<FakeSchemaProvider>,
    traversal_config: TraversalConfig,
) -> FieldPathCollector {
    FieldPathCollector::new(
        provider,
        Arc::new(FakeFieldPathCache::default()),
        traversal_config,
    )
}

fn paths(values: &[&str]) -> FieldPathSet {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[tokio::test]
async fn entity_outside_allowed_types_yields_empty_set() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider, config(2, &["AuthData"]));

    let result = service.field_paths("User").await;
    assert!(result.is_ok());
    assert!(result.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn depth_one_returns_direct_field_names_only() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider, config(1, &["User", "AuthData", "Token"]));

    let result = service.field_paths("User").await.unwrap_or_default();
    assert_eq!(
        result,
        paths(&["id", "email", "authData", "friends", "address"])
    );
}

#[tokio::test]
async fn default_depth_descends_one_level_into_allowed_types() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider, config(2, &["User", "AuthData", "Token"]));

    let result = service.field_paths("User").await.unwrap_or_default();

    assert!(result.contains("authData.email"));
    assert!(result.contains("authData.token"));
    assert!(result.contains("friends.authData"));
    assert!(!result.contains("authData.token.value"));
    assert!(result.contains("address"));
    assert!(!result.contains("address.street"));
    assert_eq!(result.deepest_path_segments(), 2);
}

#[tokio::test]
async fn self_referencing_type_terminates_at_max_depth() {
    let provider = Arc::new(FakeSchemaProvider::loaded(node_schema()));
    let service = collector(provider, config(3, &["Node"]));

    let result = service.field_paths("Node").await.unwrap_or_default();

    assert!(result.contains("parent.parent.id"));
    assert!(result.contains("children.parent.children"));
    assert!(!result.contains("parent.parent.parent.id"));
    assert_eq!(result.deepest_path_segments(), 3);
    // 3 + 2 * 3 + 4 * 3: only `parent` and `children` descend.
    assert_eq!(result.len(), 21);
}

#[tokio::test]
async fn unknown_and_scalar_entities_yield_empty_sets() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider, config(2, &["Ghost", "ID"]));

    let ghost = service.field_paths("Ghost").await;
    assert!(ghost.is_ok());
    assert!(ghost.unwrap_or_default().is_empty());

    let scalar_entity = service.field_paths("ID").await;
    assert!(scalar_entity.is_ok());
    assert!(scalar_entity.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn repeated_lookups_return_identical_sets() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider.clone(), config(2, &["User", "AuthData"]));

    let first = service.field_paths("User").await.unwrap_or_default();
    let second = service.field_paths("User").await.unwrap_or_default();

    assert_eq!(first, second);
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn warm_up_populates_cache_without_recomputation() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider.clone(), config(2, &["User", "AuthData"]));

    let warmed = service
        .warm_up(&["User".to_owned(), "AuthData".to_owned()])
        .await;
    assert!(warmed.is_ok());
    assert_eq!(provider.fetch_count(), 1);

    let user = service.field_paths("User").await.unwrap_or_default();
    let auth_data = service.field_paths("AuthData").await.unwrap_or_default();

    assert!(user.contains("authData.token"));
    assert_eq!(auth_data, paths(&["email", "token"]));
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn missing_schema_is_a_precondition_error() {
    let provider = Arc::new(FakeSchemaProvider::unloaded());
    let service = collector(provider, config(2, &["User"]));

    let lookup = service.field_paths("User").await;
    assert!(matches!(lookup, Err(AppError::SchemaUnavailable(_))));

    let warm_up = service.warm_up(&["User".to_owned()]).await;
    assert!(matches!(warm_up, Err(AppError::SchemaUnavailable(_))));
}

#[tokio::test]
async fn configure_does_not_invalidate_cached_paths() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider, config(2, &["User", "AuthData"]));

    let before = service.field_paths("User").await.unwrap_or_default();
    assert!(before.contains("authData.email"));

    let configured = service
        .configure(TraversalConfigOverrides {
            max_depth: Some(1),
            ..TraversalConfigOverrides::default()
        })
        .await;
    assert!(configured.is_ok());

    let stale = service.field_paths("User").await.unwrap_or_default();
    assert_eq!(stale, before);

    assert!(service.clear_cache().await.is_ok());
    let fresh = service.field_paths("User").await.unwrap_or_default();
    assert!(!fresh.contains("authData.email"));
    assert!(fresh.contains("authData"));
}

#[tokio::test]
async fn invalidate_recomputes_single_entity() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider.clone(), config(2, &["User", "AuthData"]));

    assert!(service.field_paths("User").await.is_ok());
    assert!(service.invalidate("User").await.is_ok());
    assert!(service.field_paths("User").await.is_ok());

    assert_eq!(provider.fetch_count(), 2);
}

#[tokio::test]
async fn configure_rejects_zero_depth_and_keeps_previous_config() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let service = collector(provider, config(2, &["User"]));

    let result = service
        .configure(TraversalConfigOverrides {
            max_depth: Some(0),
            allowed_types: Some(vec!["Order".to_owned()]),
            debug_enabled: None,
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let current = service.config().await;
    assert_eq!(current.max_depth(), 2);
    assert!(current.allows("User"));
}

#[tokio::test]
async fn debug_traversal_produces_same_paths() {
    let provider = Arc::new(FakeSchemaProvider::loaded(user_schema()));
    let quiet = collector(provider.clone(), config(2, &["User", "AuthData"]));
    let verbose = collector(
        provider,
        TraversalConfig::new(2, ["User", "AuthData"], true).unwrap_or_else(|_| unreachable!()),
    );

    assert_eq!(
        quiet.field_paths("User").await.unwrap_or_default(),
        verbose.field_paths("User").await.unwrap_or_default()
    );
}

#[tokio::test]
async fn schema_loaded_reflects_provider_state() {
    let loaded = collector(
        Arc::new(FakeSchemaProvider::loaded(user_schema())),
        config(2, &["User"]),
    );
    let unloaded = collector(Arc::new(FakeSchemaProvider::unloaded()), config(2, &["User"]));

    assert!(loaded.is_schema_loaded().await.unwrap_or_default());
    assert!(!unloaded.is_schema_loaded().await.unwrap_or_default());
}

#[tokio::test]
async fn clear_during_lookup_discards_paths_from_replaced_snapshot() {
    let provider = Arc::new(SwappableSchemaProvider::new(user_schema()));
    let cache = Arc::new(GatedFieldPathCache::armed());
    let service = FieldPathCollector::new(
        provider.clone(),
        cache.clone(),
        config(2, &["User", "AuthData"]),
    );

    let lookup = tokio::spawn({
        let service = service.clone();
        async move { service.field_paths("User").await }
    });
    cache.write_started.notified().await;

    provider.replace(renamed_user_schema()).await;
    let clearing = tokio::spawn({
        let service = service.clone();
        async move { service.clear_cache().await }
    });
    tokio::task::yield_now().await;
    cache.release_write.notify_one();

    let stale = lookup
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_default();
    assert!(stale.contains("authData"));
    assert!(matches!(clearing.await, Ok(Ok(()))));

    let fresh = service.field_paths("User").await.unwrap_or_default();
    assert_eq!(fresh, paths(&["renamed"]));
}

#[tokio::test]
async fn invalidation_before_store_skips_cache_write() {
    let provider = Arc::new(SwappableSchemaProvider::new(user_schema()));
    let cache = Arc::new(FakeFieldPathCache::default());
    let service = FieldPathCollector::new(provider, cache.clone(), config(2, &["User"]));

    let epoch = service.current_epoch().await;
    assert!(service.invalidate("User").await.is_ok());
    let stored = service
        .store_if_current(epoch, "User", paths(&["id"]))
        .await;

    assert!(stored.is_ok());
    assert!(matches!(cache.get_field_paths("User").await, Ok(None)));
}

fn generated_snapshot(field_targets: &[Vec<usize>]) -> SchemaSnapshot {
    let type_count = field_targets.len();
    let mut types: Vec<TypeDescriptor> = field_targets
        .iter()
        .enumerate()
        .map(|(type_index, targets)| {
            let fields = targets
                .iter()
                .enumerate()
                .map(|(field_index, target)| {
                    let target_name = if *target == type_count {
                        "String".to_owned()
                    } else {
                        format!("T{target}")
                    };
                    field(&format!("f{field_index}"), TypeRef::named(target_name))
                })
                .collect();
            object(&format!("T{type_index}"), fields)
        })
        .collect();
    types.push(scalar("String"));

    SchemaSnapshot::new(types).unwrap_or_else(|_| unreachable!())
}

fn arb_graph() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<bool>, u32)> {
    (1_usize..6).prop_flat_map(|type_count| {
        (
            prop::collection::vec(prop::collection::vec(0..=type_count, 0..5), type_count),
            prop::collection::vec(any::<bool>(), type_count),
            1_u32..5,
        )
    })
}

proptest! {
    #[test]
    fn paths_never_exceed_max_depth((field_targets, allowed, max_depth) in arb_graph()) {
        let snapshot = generated_snapshot(&field_targets);
        let allowed_types: Vec<String> = allowed
            .iter()
            .enumerate()
            .filter(|(_, is_allowed)| **is_allowed)
            .map(|(index, _)| format!("T{index}"))
            .collect();
        let traversal_config = TraversalConfig::new(max_depth, allowed_types, false)
            .unwrap_or_else(|_| unreachable!());

        let result = collect_field_paths(&snapshot, "T0", &traversal_config);

        prop_assert!(result.deepest_path_segments() <= max_depth as usize);
        if !allowed[0] {
            prop_assert!(result.is_empty());
        } else {
            let direct: Vec<&str> = result.iter().filter(|path| !path.contains('.')).collect();
            prop_assert_eq!(direct.len(), field_targets[0].len());
        }
    }

    #[test]
    fn depth_one_never_produces_dotted_paths((field_targets, _allowed, _depth) in arb_graph()) {
        let snapshot = generated_snapshot(&field_targets);
        let names: Vec<String> = (0..field_targets.len()).map(|index| format!("T{index}")).collect();
        let traversal_config = TraversalConfig::new(1, names, false)
            .unwrap_or_else(|_| unreachable!());

        let result = collect_field_paths(&snapshot, "T0", &traversal_config);

        prop_assert_eq!(result.len(), field_targets[0].len());
        prop_assert!(result.iter().all(|path| !path.contains('.')));
    }
}
