use serde::{Deserialize, Serialize};

/// Field-level permission row returned by a permission authority for one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupPermissionRecord {
    /// Entity type the permission applies to.
    pub entity_name: String,
    /// Dotted field path within the entity.
    pub field_path: String,
    /// Read access for the field.
    pub can_view: bool,
}

impl GroupPermissionRecord {
    /// Creates a permission record.
    #[must_use]
    pub fn new(
        entity_name: impl Into<String>,
        field_path: impl Into<String>,
        can_view: bool,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            field_path: field_path.into(),
            can_view,
        }
    }

    /// Returns whether the record grants view access on the given entity.
    #[must_use]
    pub fn grants_view_on(&self, entity_name: &str) -> bool {
        self.can_view && self.entity_name == entity_name
    }
}

#[cfg(test)]
mod tests {
    use super::GroupPermissionRecord;

    #[test]
    fn view_grant_requires_flag_and_matching_entity() {
        assert!(GroupPermissionRecord::new("User", "email", true).grants_view_on("User"));
        assert!(!GroupPermissionRecord::new("User", "email", false).grants_view_on("User"));
        assert!(!GroupPermissionRecord::new("Order", "total", true).grants_view_on("User"));
    }
}
