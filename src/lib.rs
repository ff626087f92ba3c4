pub mod api;
pub mod config;
pub mod log;
pub mod version;
