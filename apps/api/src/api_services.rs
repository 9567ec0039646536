mod database;
mod state_builder;
mod warm_up;

pub use state_builder::build_app_state;
pub use warm_up::warm_up_field_paths;
