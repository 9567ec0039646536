use std::collections::HashMap;

use async_trait::async_trait;
use fieldgate_application::LocalPermissionAuthority;
use fieldgate_core::AppResult;
use fieldgate_domain::GroupPermissionRecord;
use tokio::sync::RwLock;

/// In-process permission authority keyed by group id.
#[derive(Debug, Default)]
pub struct InMemoryPermissionAuthority {
    records: RwLock<HashMap<String, Vec<GroupPermissionRecord>>>,
}

impl InMemoryPermissionAuthority {
    /// Creates an authority with no grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an authority seeded with records per group.
    #[must_use]
    pub fn with_records(records: HashMap<String, Vec<GroupPermissionRecord>>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Appends one permission record to a group.
    pub async fn grant(&self, group_id: impl Into<String>, record: GroupPermissionRecord) {
        self.records
            .write()
            .await
            .entry(group_id.into())
            .or_default()
            .push(record);
    }
}

#[async_trait]
impl LocalPermissionAuthority for InMemoryPermissionAuthority {
    async fn find_permissions_by_group(
        &self,
        group_id: &str,
    ) -> AppResult<Vec<GroupPermissionRecord>> {
        Ok(self
            .records
            .read()
            .await
            .get(group_id)
            .cloned()
            .unwrap_or_default())
    }
}
