use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Separator between the segments of a dotted field path.
pub(crate) const FIELD_PATH_SEPARATOR: char = '.';

/// Joins a parent path and a field name into a dotted field path.
#[must_use]
pub fn join_field_path(prefix: &str, field_name: &str) -> String {
    if prefix.is_empty() {
        field_name.to_owned()
    } else {
        format!("{prefix}{FIELD_PATH_SEPARATOR}{field_name}")
    }
}

/// Returns the number of dotted segments of a field path.
#[must_use]
pub fn path_segment_count(path: &str) -> usize {
    if path.is_empty() {
        0
    } else {
        path.split(FIELD_PATH_SEPARATOR).count()
    }
}

/// Field paths reachable from one entity under one traversal configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPathSet(BTreeSet<String>);

impl FieldPathSet {
    /// Creates an empty path set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one path, returning whether it was new.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.0.insert(path.into())
    }

    /// Returns whether the set contains the path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    /// Returns the number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates paths in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the segment count of the deepest path.
    #[must_use]
    pub fn deepest_path_segments(&self) -> usize {
        self.0
            .iter()
            .map(|path| path_segment_count(path))
            .max()
            .unwrap_or(0)
    }

    /// Consumes the set and returns the inner paths.
    #[must_use]
    pub fn into_inner(self) -> BTreeSet<String> {
        self.0
    }
}

impl FromIterator<String> for FieldPathSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Union of field paths viewable by a set of access groups for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewableFieldSet(BTreeSet<String>);

impl ViewableFieldSet {
    /// Creates an empty viewable set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one viewable path.
    pub fn insert(&mut self, path: impl Into<String>) -> bool {
        self.0.insert(path.into())
    }

    /// Returns whether the path is viewable.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    /// Returns the number of viewable paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether nothing is viewable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates viewable paths in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Consumes the set and returns the inner paths.
    #[must_use]
    pub fn into_inner(self) -> BTreeSet<String> {
        self.0
    }
}

impl FromIterator<String> for ViewableFieldSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
