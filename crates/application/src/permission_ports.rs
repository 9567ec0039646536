use async_trait::async_trait;
use fieldgate_core::AppResult;
use fieldgate_domain::GroupPermissionRecord;

/// Out-of-process permission authority reached through a request/response call.
#[async_trait]
pub trait RemotePermissionAuthority: Send + Sync {
    /// Finds field permissions of one group, scoped to one entity by the authority.
    ///
    /// `None` and an empty list both mean the group has no records.
    async fn find_permissions_by_group(
        &self,
        group_id: &str,
        entity_name: &str,
    ) -> AppResult<Option<Vec<GroupPermissionRecord>>>;
}

/// In-process permission authority.
#[async_trait]
pub trait LocalPermissionAuthority: Send + Sync {
    /// Lists field permissions of one group across all entities.
    async fn find_permissions_by_group(
        &self,
        group_id: &str,
    ) -> AppResult<Vec<GroupPermissionRecord>>;
}
