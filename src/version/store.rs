//! Key-value storage seam for the cached version record

#[cfg(test)]
use mockall::automock;

use tracing::debug;

use crate::version::error::CacheError;
use crate::version::types::VersionRecord;

/// Trait for an external key-value store holding opaque string values
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Get the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, overwriting any previous value
    fn put(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// Load and deserialize the version record stored under `key`
pub fn load_record(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<VersionRecord>, CacheError> {
    let Some(raw) = store.get(key)? else {
        debug!("No cached record under {}", key);
        return Ok(None);
    };

    let record = serde_json::from_str(&raw)?;
    Ok(Some(record))
}

/// Serialize and store the version record under `key`
pub fn save_record(
    store: &dyn KeyValueStore,
    key: &str,
    record: &VersionRecord,
) -> Result<(), CacheError> {
    let raw = serde_json::to_string(record)?;
    store.put(key, &raw)
}
