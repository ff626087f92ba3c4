//! Common types for version records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Result of a refresh: the latest package version and where it can be downloaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    /// Latest published version, or "unknown" if the registry could not be queried
    pub package_version: String,
    /// Mirror name -> whether the versioned asset answered a HEAD request
    pub mirror_availability: IndexMap<String, bool>,
    /// Milliseconds since UNIX epoch when the record was produced
    pub last_updated: i64,
}

impl VersionRecord {
    pub fn new(
        package_version: String,
        mirror_availability: IndexMap<String, bool>,
        last_updated: i64,
    ) -> Self {
        Self {
            package_version,
            mirror_availability,
            last_updated,
        }
    }

    /// Returns the number of mirrors serving the current version
    pub fn available_mirror_count(&self) -> usize {
        self.mirror_availability.values().filter(|ok| **ok).count()
    }
}
