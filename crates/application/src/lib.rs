//! Application services and ports.

#![forbid(unsafe_code)]

mod field_path_collector;
mod permission_ports;
mod permission_resolver;
mod schema_ports;

pub use field_path_collector::FieldPathCollector;
pub use permission_ports::{LocalPermissionAuthority, RemotePermissionAuthority};
pub use permission_resolver::{PermissionResolver, PermissionStrategy};
pub use schema_ports::{FieldPathCache, SchemaGraphProvider};
