//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod field_path;
mod permission;
mod schema;
mod traversal;

pub use field_path::{FieldPathSet, ViewableFieldSet, join_field_path, path_segment_count};
pub use permission::GroupPermissionRecord;
pub use schema::{FieldDescriptor, SchemaSnapshot, TypeDescriptor, TypeKind, TypeRef};
pub use traversal::{DEFAULT_MAX_DEPTH, TraversalConfig, TraversalConfigOverrides};
