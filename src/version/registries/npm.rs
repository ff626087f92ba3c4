//! npm registry API implementation

use std::collections::HashMap;

use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use serde::Deserialize;
use tracing::{debug, warn};

/// Default base URL for npm registry
pub const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Response from npm registry API
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
}

/// Registry implementation for npm registry API
#[derive(Clone)]
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("cdn-version-api/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = format!("{}/{}", self.base_url, encoded_name);

        debug!("Fetching npm metadata from {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("npm registry returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let package_info: NpmPackageResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        package_info
            .dist_tags
            .get("latest")
            .cloned()
            .ok_or_else(|| {
                RegistryError::InvalidResponse(format!(
                    "No latest dist tag for {}",
                    package_name
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_latest_version_returns_latest_dist_tag() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/hexo-theme-redefine-x")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "hexo-theme-redefine-x",
                    "dist-tags": { "latest": "2.3.1", "beta": "2.4.0-beta.1" },
                    "versions": { "2.3.0": {}, "2.3.1": {}, "2.4.0-beta.1": {} }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry
            .fetch_latest_version("hexo-theme-redefine-x")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "2.3.1");
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_not_found_for_nonexistent_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nonexistent-package")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Not found"}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_latest_version("nonexistent-package").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_handles_scoped_package() {
        let mut server = Server::new_async().await;

        // Scoped packages use URL encoding: @types/node -> @types%2Fnode
        let mock = server
            .mock("GET", "/@types%2Fnode")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "@types/node", "dist-tags": {"latest": "20.0.0"}}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_latest_version("@types/node").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, "20.0.0");
    }

    #[tokio::test]
    async fn fetch_latest_version_rejects_response_without_latest_tag() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/untagged")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "untagged", "dist-tags": {"next": "1.0.0"}}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_latest_version("untagged").await;

        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_rejects_malformed_body() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_latest_version("broken").await;

        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_reports_server_errors() {
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/flaky")
            .with_status(503)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_latest_version("flaky").await;

        assert!(
            matches!(result, Err(RegistryError::InvalidResponse(msg)) if msg.contains("503"))
        );
    }
}
