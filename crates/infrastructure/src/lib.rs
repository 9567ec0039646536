//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_permission_authority;
mod http_schema_graph_provider;
mod in_memory_field_path_cache;
mod in_memory_permission_authority;
mod in_memory_schema_graph_provider;
mod postgres_permission_authority;

pub use http_permission_authority::{HttpPermissionAuthority, HttpPermissionAuthorityConfig};
pub use http_schema_graph_provider::HttpSchemaGraphProvider;
pub use in_memory_field_path_cache::InMemoryFieldPathCache;
pub use in_memory_permission_authority::InMemoryPermissionAuthority;
pub use in_memory_schema_graph_provider::InMemorySchemaGraphProvider;
pub use postgres_permission_authority::PostgresPermissionAuthority;
