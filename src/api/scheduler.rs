//! Scheduled refresh of the cached version record

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::version::refresh::Refresher;

/// Run one refresh on behalf of a timer, logging the outcome
///
/// On failure the cache keeps its previous record.
pub async fn run_scheduled_refresh(refresher: &Refresher) {
    info!("Running scheduled version refresh...");

    match refresher.refresh().await {
        Ok(record) => info!(
            version = %record.package_version,
            available = record.available_mirror_count(),
            mirrors = record.mirror_availability.len(),
            "Version data refreshed successfully"
        ),
        Err(e) => error!(error = %e, "Scheduled refresh failed"),
    }
}

/// Spawn a task that refreshes every `period`, starting one period from now
pub fn spawn_periodic_refresh(refresher: Arc<Refresher>, period: Duration) -> JoinHandle<()> {
    info!("Scheduling version refresh every {:?}", period);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_scheduled_refresh(&refresher).await;
        }
    })
}
