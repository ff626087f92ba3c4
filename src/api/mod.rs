//! HTTP API layer
//!
//! # Modules
//!
//! - [`response`]: JSON envelopes and the `ApiError` → response mapping
//! - [`routes`]: Router, shared state and request handlers
//! - [`scheduler`]: Timer-driven refresh
//! - [`server`]: Server initialization and lifecycle

pub mod response;
pub mod routes;
pub mod scheduler;
pub mod server;
