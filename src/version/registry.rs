//! Registry trait for fetching the latest published version of a package

#[cfg(test)]
use mockall::automock;

use crate::version::error::RegistryError;

/// Trait for fetching package metadata from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches the version the registry tags as latest
    ///
    /// # Arguments
    /// * `package_name` - The name of the package (e.g., "@types/node")
    ///
    /// # Returns
    /// * `Ok(String)` - The version string of the `latest` dist tag
    /// * `Err(RegistryError)` - If the fetch fails or the response has no latest tag
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError>;
}
