//! Refresh orchestration: registry lookup, mirror fan-out and cache write

use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, MirrorConfig, UNKNOWN_VERSION};
use crate::version::error::{CacheError, RefreshError, RegistryError};
use crate::version::probe::{MirrorClient, probe_mirror};
use crate::version::registry::Registry;
use crate::version::store::{KeyValueStore, load_record, save_record};
use crate::version::types::VersionRecord;

/// Produces and caches version records for one package and a fixed set of mirrors.
///
/// The registry, mirror client and store are injected so every handler and
/// the scheduler share the same instances.
pub struct Refresher {
    registry: Arc<dyn Registry>,
    mirror_client: Arc<dyn MirrorClient>,
    store: Arc<dyn KeyValueStore>,
    package_name: String,
    strict: bool,
    mirrors: Vec<MirrorConfig>,
    cache_key: String,
}

impl Refresher {
    pub fn new(
        registry: Arc<dyn Registry>,
        mirror_client: Arc<dyn MirrorClient>,
        store: Arc<dyn KeyValueStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            registry,
            mirror_client,
            store,
            package_name: config.package.name.clone(),
            strict: config.package.strict,
            mirrors: config.mirrors.clone(),
            cache_key: config.cache.key.clone(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn mirrors(&self) -> &[MirrorConfig] {
        &self.mirrors
    }

    /// Fetch the latest version, substituting "unknown" for failures unless strict
    async fn fetch_version(&self) -> Result<String, RegistryError> {
        match self.registry.fetch_latest_version(&self.package_name).await {
            Ok(version) => Ok(version),
            Err(e) if self.strict => Err(e),
            Err(e) => {
                warn!(
                    "Failed to fetch latest version of {}: {}. Using \"{}\"",
                    self.package_name, e, UNKNOWN_VERSION
                );
                Ok(UNKNOWN_VERSION.to_string())
            }
        }
    }

    /// Run a full refresh and overwrite the cached record
    ///
    /// All mirrors are probed concurrently and the refresh waits for every probe.
    /// Nothing is written when the registry lookup (strict mode) or the store fails.
    pub async fn refresh(&self) -> Result<VersionRecord, RefreshError> {
        let version = self.fetch_version().await?;
        debug!(
            "Probing {} mirrors for {}@{}",
            self.mirrors.len(),
            self.package_name,
            version
        );

        let client = self.mirror_client.as_ref();
        let probes = self
            .mirrors
            .iter()
            .map(|mirror| probe_mirror(client, &mirror.url_template, &version));
        let results = join_all(probes).await;

        let mirror_availability: IndexMap<String, bool> = self
            .mirrors
            .iter()
            .map(|mirror| mirror.name.clone())
            .zip(results)
            .collect();

        let record = VersionRecord::new(
            version,
            mirror_availability,
            chrono::Utc::now().timestamp_millis(),
        );

        save_record(self.store.as_ref(), &self.cache_key, &record)?;
        info!(
            "Refreshed {}@{}: {}/{} mirrors available",
            self.package_name,
            record.package_version,
            record.available_mirror_count(),
            record.mirror_availability.len()
        );

        Ok(record)
    }

    /// Get the cached record without refreshing
    pub fn cached(&self) -> Result<Option<VersionRecord>, CacheError> {
        load_record(self.store.as_ref(), &self.cache_key)
    }

    /// Get the cached record, refreshing synchronously on a cold cache
    pub async fn cached_or_refresh(&self) -> Result<VersionRecord, RefreshError> {
        if let Some(record) = self.cached()? {
            return Ok(record);
        }

        info!("Cache is empty, refreshing {}", self.package_name);
        self.refresh().await
    }
}
