use std::sync::Arc;

use fieldgate_core::{AppError, AppResult};

use crate::permission_ports::{LocalPermissionAuthority, RemotePermissionAuthority};

/// Permission source selected once at startup.
#[derive(Clone)]
pub enum PermissionStrategy {
    /// Authority reached out of process; the query is scoped by entity remotely.
    Remote(Arc<dyn RemotePermissionAuthority>),
    /// Authority reached in process; records span every entity of a group.
    Local(Arc<dyn LocalPermissionAuthority>),
}

impl PermissionStrategy {
    /// Resolves optional authority handles into one strategy.
    ///
    /// The remote authority wins when both are present. Having neither is a
    /// deployment error.
    pub fn from_authorities(
        remote: Option<Arc<dyn RemotePermissionAuthority>>,
        local: Option<Arc<dyn LocalPermissionAuthority>>,
    ) -> AppResult<Self> {
        match (remote, local) {
            (Some(remote), _) => Ok(Self::Remote(remote)),
            (None, Some(local)) => Ok(Self::Local(local)),
            (None, None) => Err(AppError::Configuration(
                "neither a remote nor a local permission authority is configured".to_owned(),
            )),
        }
    }

    /// Returns a stable name for the strategy.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Local(_) => "local",
        }
    }

    pub(super) async fn viewable_paths_for_group(
        &self,
        group_id: &str,
        entity_name: &str,
    ) -> AppResult<Vec<String>> {
        match self {
            Self::Remote(authority) => Ok(authority
                .find_permissions_by_group(group_id, entity_name)
                .await?
                .unwrap_or_default()
                .into_iter()
                .filter(|record| record.can_view)
                .map(|record| record.field_path)
                .collect()),
            Self::Local(authority) => Ok(authority
                .find_permissions_by_group(group_id)
                .await?
                .into_iter()
                .filter(|record| record.grants_view_on(entity_name))
                .map(|record| record.field_path)
                .collect()),
        }
    }
}
