//! Registry, mirror and store fakes

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use reqwest::StatusCode;
use tempfile::TempDir;

use cdn_version_api::config::{AppConfig, MirrorConfig, PackageConfig};
use cdn_version_api::version::cache::Cache;
use cdn_version_api::version::error::{CacheError, ProbeError, RegistryError};
use cdn_version_api::version::probe::MirrorClient;
use cdn_version_api::version::refresh::Refresher;
use cdn_version_api::version::registry::Registry;
use cdn_version_api::version::store::KeyValueStore;

pub const PACKAGE: &str = "hexo-theme-redefine-x";

/// Registry returning a fixed version, or NotFound when none is set
pub struct FakeRegistry {
    version: Option<String>,
    calls: AtomicUsize,
}

impl FakeRegistry {
    pub fn with_version(version: &str) -> Self {
        Self {
            version: Some(version.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            version: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.version
            .clone()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}

/// Mirror client answering 200 for URLs on the listed hosts and 404 otherwise
pub struct CountingMirrorClient {
    available_hosts: HashSet<String>,
    calls: AtomicUsize,
}

impl CountingMirrorClient {
    pub fn new(available_hosts: &[&str]) -> Self {
        Self {
            available_hosts: available_hosts.iter().map(|h| h.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MirrorClient for CountingMirrorClient {
    async fn head(&self, url: &str) -> Result<StatusCode, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let host = url
            .trim_start_matches("https://")
            .split('/')
            .next()
            .unwrap_or_default();
        if self.available_hosts.contains(host) {
            Ok(StatusCode::OK)
        } else {
            Ok(StatusCode::NOT_FOUND)
        }
    }
}

/// Store whose reads are empty and whose writes always fail
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        Err(CacheError::LockPoisoned)
    }
}

/// Configuration with three mirrors on distinct hosts
pub fn test_config() -> AppConfig {
    AppConfig {
        package: PackageConfig {
            name: PACKAGE.to_string(),
            ..PackageConfig::default()
        },
        mirrors: vec![
            MirrorConfig::new("jsdelivrCDN", "https://jsdelivr.test/npm/pkg@{version}/main.js"),
            MirrorConfig::new("unpkgCDN", "https://unpkg.test/pkg@{version}/main.js"),
            MirrorConfig::new("cdnjsCDN", "https://cdnjs.test/libs/pkg/{version}/main.js"),
        ],
        ..AppConfig::default()
    }
}

/// Create an empty SQLite cache in a temporary directory
pub fn create_test_cache() -> (TempDir, Arc<Cache>) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let cache = Cache::new(&db_path).unwrap();

    (temp_dir, Arc::new(cache))
}

/// Create a refresher over the given fakes with [`test_config`]
pub fn create_test_refresher(
    registry: Arc<FakeRegistry>,
    client: Arc<CountingMirrorClient>,
    store: Arc<dyn KeyValueStore>,
) -> Arc<Refresher> {
    Arc::new(Refresher::new(registry, client, store, &test_config()))
}
