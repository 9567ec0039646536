pub mod cache;
pub mod field_paths;
pub mod health;
pub mod permissions;
pub mod schema;
pub mod traversal_config;
