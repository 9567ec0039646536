use std::collections::BTreeSet;

use fieldgate_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Depth used when no explicit maximum is configured.
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Process-wide settings for field-path discovery.
///
/// `max_depth` bounds the number of segments of every discovered path.
/// Only types listed in `allowed_types` are entered recursively, and an
/// entity outside the list yields no paths at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    max_depth: u32,
    allowed_types: BTreeSet<String>,
    debug_enabled: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allowed_types: BTreeSet::new(),
            debug_enabled: false,
        }
    }
}

impl TraversalConfig {
    /// Creates a validated traversal configuration.
    pub fn new<I, S>(max_depth: u32, allowed_types: I, debug_enabled: bool) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        validate_max_depth(max_depth)?;

        Ok(Self {
            max_depth,
            allowed_types: normalize_type_names(allowed_types),
            debug_enabled,
        })
    }

    /// Returns the maximum path depth in segments.
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Returns the type names eligible for traversal.
    #[must_use]
    pub fn allowed_types(&self) -> &BTreeSet<String> {
        &self.allowed_types
    }

    /// Returns whether verbose traversal logging is enabled.
    #[must_use]
    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Returns whether the type name may be traversed.
    #[must_use]
    pub fn allows(&self, type_name: &str) -> bool {
        self.allowed_types.contains(type_name)
    }

    /// Returns a new configuration with the overrides applied.
    pub fn with_overrides(&self, overrides: TraversalConfigOverrides) -> AppResult<Self> {
        let max_depth = overrides.max_depth.unwrap_or(self.max_depth);
        validate_max_depth(max_depth)?;

        Ok(Self {
            max_depth,
            allowed_types: overrides
                .allowed_types
                .map(normalize_type_names)
                .unwrap_or_else(|| self.allowed_types.clone()),
            debug_enabled: overrides.debug_enabled.unwrap_or(self.debug_enabled),
        })
    }
}

/// Independently optional overrides for [`TraversalConfig`].
///
/// Absent values leave the current setting unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfigOverrides {
    /// Replacement maximum depth.
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Replacement allow-list of traversable type names.
    #[serde(default)]
    pub allowed_types: Option<Vec<String>>,
    /// Replacement debug flag.
    #[serde(default)]
    pub debug_enabled: Option<bool>,
}

fn validate_max_depth(max_depth: u32) -> AppResult<()> {
    if max_depth == 0 {
        return Err(AppError::Validation(
            "traversal max_depth must be at least 1".to_owned(),
        ));
    }

    Ok(())
}

fn normalize_type_names<I, S>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MAX_DEPTH, TraversalConfig, TraversalConfigOverrides};

    #[test]
    fn default_config_has_depth_two_and_no_allowed_types() {
        let config = TraversalConfig::default();
        assert_eq!(config.max_depth(), DEFAULT_MAX_DEPTH);
        assert!(config.allowed_types().is_empty());
        assert!(!config.debug_enabled());
    }

    #[test]
    fn zero_depth_is_rejected() {
        assert!(TraversalConfig::new(0, ["User"], false).is_err());
    }

    #[test]
    fn absent_overrides_keep_current_values() {
        let config =
            TraversalConfig::new(3, ["User", "AuthData"], true).unwrap_or_else(|_| unreachable!());

        let updated = config.with_overrides(TraversalConfigOverrides {
            max_depth: None,
            allowed_types: None,
            debug_enabled: Some(false),
        });
        assert!(updated.is_ok());
        let updated = updated.unwrap_or_else(|_| unreachable!());

        assert_eq!(updated.max_depth(), 3);
        assert!(updated.allows("AuthData"));
        assert!(!updated.debug_enabled());
    }

    #[test]
    fn allowed_types_override_replaces_whole_list() {
        let config = TraversalConfig::new(2, ["User"], false).unwrap_or_else(|_| unreachable!());

        let updated = config
            .with_overrides(TraversalConfigOverrides {
                allowed_types: Some(vec!["Order".to_owned(), "  ".to_owned()]),
                ..TraversalConfigOverrides::default()
            })
            .unwrap_or_else(|_| unreachable!());

        assert!(!updated.allows("User"));
        assert!(updated.allows("Order"));
        assert_eq!(updated.allowed_types().len(), 1);
    }

    #[test]
    fn invalid_override_leaves_config_untouched() {
        let config = TraversalConfig::new(2, ["User"], false).unwrap_or_else(|_| unreachable!());
        let result = config.with_overrides(TraversalConfigOverrides {
            max_depth: Some(0),
            ..TraversalConfigOverrides::default()
        });

        assert!(result.is_err());
        assert_eq!(config.max_depth(), 2);
    }
}
