use fieldgate_core::AppResult;
use fieldgate_domain::ViewableFieldSet;
use tracing::warn;

mod strategy;


pub use strategy::PermissionStrategy;

/// Application service resolving the fields a set of access groups may view.
///
/// Results are never cached: every call re-queries the configured authority.
#[derive(Clone)]
pub struct PermissionResolver {
    strategy: PermissionStrategy,
}

impl PermissionResolver {
    /// Creates a resolver bound to one permission strategy.
    #[must_use]
    pub fn new(strategy: PermissionStrategy) -> Self {
        Self { strategy }
    }

    /// Returns the stable name of the active strategy.
    #[must_use]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.as_str()
    }

    /// Returns the union of viewable field paths across all groups for one entity.
    ///
    /// Groups are queried one after another. The first failing query fails the
    /// whole call so a partial union is never returned.
    pub async fn viewable_fields(
        &self,
        group_ids: &[String],
        entity_name: &str,
    ) -> AppResult<ViewableFieldSet> {
        let mut viewable_fields = ViewableFieldSet::new();

        for group_id in group_ids {
            let granted = self
                .strategy
                .viewable_paths_for_group(group_id, entity_name)
                .await
                .inspect_err(|error| {
                    warn!(
                        strategy = self.strategy.as_str(),
                        group_id = %group_id,
                        entity = %entity_name,
                        error = %error,
                        "permission lookup failed"
                    );
                })?;

            for field_path in granted {
                viewable_fields.insert(field_path);
            }
        }

        Ok(viewable_fields)
    }
}
