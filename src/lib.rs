pub mod actions;
pub mod auth;
pub mod config;
pub mod errors;
pub mod ops;
pub mod paths;

mod app;

// Re-export App and Config from modules
pub use app::App;
pub use config::Config;
