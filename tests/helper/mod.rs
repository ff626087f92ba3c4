//! Shared test utilities
#![allow(dead_code)]

pub mod http;
pub mod registry;

pub use http::{send, send_json};
pub use registry::{
    CountingMirrorClient, FailingStore, FakeRegistry, create_test_cache, create_test_refresher,
};
