use async_trait::async_trait;
use fieldgate_application::LocalPermissionAuthority;
use fieldgate_core::{AppError, AppResult};
use fieldgate_domain::GroupPermissionRecord;
use sqlx::{FromRow, PgPool};


/// PostgreSQL-backed local permission authority.
#[derive(Clone)]
pub struct PostgresPermissionAuthority {
    pool: PgPool,
}

impl PostgresPermissionAuthority {
    /// Creates an authority with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GroupFieldPermissionRow {
    entity_name: String,
    field_path: String,
    can_view: bool,
}

impl From<GroupFieldPermissionRow> for GroupPermissionRecord {
    fn from(row: GroupFieldPermissionRow) -> Self {
        Self {
            entity_name: row.entity_name,
            field_path: row.field_path,
            can_view: row.can_view,
        }
    }
}

#[async_trait]
impl LocalPermissionAuthority for PostgresPermissionAuthority {
    async fn find_permissions_by_group(
        &self,
        group_id: &str,
    ) -> AppResult<Vec<GroupPermissionRecord>> {
        let rows = sqlx::query_as::<_, GroupFieldPermissionRow>(
            r#"
            SELECT entity_name, field_path, can_view
            FROM group_field_permissions
            WHERE group_id = $1
            ORDER BY entity_name, field_path
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load field permissions for group '{group_id}': {error}"
            ))
        })?;

        Ok(rows.into_iter().map(GroupPermissionRecord::from).collect())
    }
}
