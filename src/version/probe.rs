//! Availability probing of versioned assets on CDN mirrors

#[cfg(test)]
use mockall::automock;

use reqwest::StatusCode;
use tracing::debug;

use crate::config::{MAX_PROBE_ATTEMPTS, VERSION_PLACEHOLDER};
use crate::version::error::ProbeError;

/// Trait for issuing HEAD requests against mirror URLs
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MirrorClient: Send + Sync {
    /// Sends a HEAD request and returns the response status
    async fn head(&self, url: &str) -> Result<StatusCode, ProbeError>;
}

/// MirrorClient backed by reqwest
#[derive(Clone)]
pub struct HttpMirrorClient {
    client: reqwest::Client,
}

impl HttpMirrorClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("cdn-version-api/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for HttpMirrorClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MirrorClient for HttpMirrorClient {
    async fn head(&self, url: &str) -> Result<StatusCode, ProbeError> {
        let response = self.client.head(url).send().await?;
        Ok(response.status())
    }
}

/// Substitutes the version into a mirror URL template
pub fn render_url(url_template: &str, version: &str) -> String {
    url_template.replace(VERSION_PLACEHOLDER, version)
}

/// Checks whether the mirror serves the given version.
///
/// Issues up to [`MAX_PROBE_ATTEMPTS`] HEAD requests with no delay in between and
/// stops at the first 2xx response. Network errors and non-2xx statuses count as
/// failed attempts. Never fails: an unreachable mirror is reported as `false`.
pub async fn probe_mirror(client: &dyn MirrorClient, url_template: &str, version: &str) -> bool {
    let url = render_url(url_template, version);

    let mut attempts = 0;
    let mut success = false;

    while attempts < MAX_PROBE_ATTEMPTS && !success {
        attempts += 1;
        match client.head(&url).await {
            Ok(status) if status.is_success() => success = true,
            Ok(status) => debug!(
                "Probe {}/{} of {} returned {}",
                attempts, MAX_PROBE_ATTEMPTS, url, status
            ),
            Err(e) => debug!(
                "Probe {}/{} of {} failed: {}",
                attempts, MAX_PROBE_ATTEMPTS, url, e
            ),
        }
    }

    success
}
