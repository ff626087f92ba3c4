use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default scheduled refresh interval in milliseconds (1 hour)
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60 * 60 * 1000;

// =============================================================================
// Probe and cache constants
// =============================================================================

/// Maximum number of HEAD requests issued against a single mirror per refresh
pub const MAX_PROBE_ATTEMPTS: u32 = 3;

/// Placeholder substituted with the package version in mirror URL templates
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Version reported when the registry could not be queried
pub const UNKNOWN_VERSION: &str = "unknown";

const DEFAULT_PACKAGE_NAME: &str = "hexo-theme-redefine-x";
const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";
const DEFAULT_CACHE_KEY: &str = "versionData";
const DEFAULT_BIND: &str = "0.0.0.0:8787";

const APP_NAME: &str = "cdn-version-api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub package: PackageConfig,
    pub mirrors: Vec<MirrorConfig>,
    pub cache: CacheConfig,
    /// Scheduled refresh interval in milliseconds, 0 disables the timer
    pub refresh_interval: u64,
    /// Address the HTTP server listens on
    pub bind: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            package: PackageConfig::default(),
            mirrors: default_mirrors(),
            cache: CacheConfig::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL_MS,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

/// Package whose latest version is tracked
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageConfig {
    pub name: String,
    pub registry_url: String,
    /// Abort a refresh when the registry fails instead of recording "unknown"
    pub strict: bool,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PACKAGE_NAME.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            strict: false,
        }
    }
}

/// A CDN mirror and the URL template probed for availability
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MirrorConfig {
    pub name: String,
    pub url_template: String,
}

impl MirrorConfig {
    pub fn new(name: &str, url_template: &str) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
        }
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Key the version record is stored under
    pub key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_CACHE_KEY.to_string(),
        }
    }
}

fn default_mirrors() -> Vec<MirrorConfig> {
    vec![
        MirrorConfig::new(
            "jsdelivrCDN",
            "https://cdn.jsdelivr.net/npm/hexo-theme-redefine-x@{version}/source/js/build/main.js",
        ),
        MirrorConfig::new(
            "unpkgCDN",
            "https://unpkg.com/hexo-theme-redefine-x@{version}/source/js/build/main.js",
        ),
        MirrorConfig::new(
            "cdnjsCDN",
            "https://cdnjs.cloudflare.com/ajax/libs/hexo-theme-redefine-x/{version}/source/js/build/main.js",
        ),
        MirrorConfig::new(
            "zstaticCDN",
            "https://s4.zstatic.net/ajax/libs/hexo-theme-redefine-x/{version}/source/js/build/main.js",
        ),
        MirrorConfig::new(
            "npmmirrorCDN",
            "https://registry.npmmirror.com/hexo-theme-redefine-x/{version}/files/source/js/build/main.js",
        ),
    ]
}

impl AppConfig {
    /// Loads the configuration from a JSON file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                serde_json::from_str::<AppConfig>(&content)?
            }
            None => AppConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks that the mirror set can produce a well-formed version record.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.package.name.is_empty() {
            return Err(ConfigError::Invalid("package name is empty".to_string()));
        }
        if self.mirrors.is_empty() {
            return Err(ConfigError::Invalid("no mirrors configured".to_string()));
        }
        if self.cache.key.is_empty() {
            return Err(ConfigError::Invalid("cache key is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for mirror in &self.mirrors {
            if mirror.name.is_empty() {
                return Err(ConfigError::Invalid("mirror name is empty".to_string()));
            }
            if !seen.insert(mirror.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate mirror name: {}",
                    mirror.name
                )));
            }
            if !mirror.url_template.contains(VERSION_PLACEHOLDER) {
                tracing::warn!(
                    "Mirror {} has no {} placeholder in its URL template",
                    mirror.name,
                    VERSION_PLACEHOLDER
                );
            }
        }

        Ok(())
    }
}

/// Returns the path to the data directory for cdn-version-api.
/// Uses $XDG_DATA_HOME/cdn-version-api if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/cdn-version-api,
/// or ./cdn-version-api if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the default path to the cache database file.
pub fn db_path() -> PathBuf {
    data_dir().join("versions.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(format!("{}.log", APP_NAME))
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_NAME)
}
