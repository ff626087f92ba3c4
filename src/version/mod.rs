//! Version tracking layer: registry lookup, mirror probing and record caching
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Registry  │────▶│  Refresher  │────▶│    Store    │
//! │  (latest)   │     │ (orchestr.) │     │ (key-value) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Probe    │     │    Cache    │
//!                     │ (HEAD x 3)  │     │  (SQLite)   │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: SQLite-backed key-value store
//! - [`error`]: Error types for cache, registry, probe and refresh operations
//! - [`probe`]: Mirror client trait and the bounded-retry availability probe
//! - [`refresh`]: Refresh orchestration and cached-record lookup
//! - [`registry`]: Registry trait for fetching the latest version
//! - [`registries`]: Concrete registry implementations (npm)
//! - [`store`]: Key-value store trait and record (de)serialization
//! - [`types`]: The cached `VersionRecord`

pub mod cache;
pub mod error;
pub mod probe;
pub mod refresh;
pub mod registries;
pub mod registry;
pub mod store;
pub mod types;
