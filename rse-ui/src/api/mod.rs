//! HTTP API handlers for rse-ui

pub mod analyze;
pub mod health;
pub mod settings;
pub mod status;
pub mod ui;

pub use analyze::analyze;
pub use health::health_routes;
pub use settings::save_credential;
pub use status::get_status;
pub use ui::{serve_app_js, serve_index};
