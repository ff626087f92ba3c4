//! HTTP server initialization and lifecycle

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::routes::{AppState, router};
use crate::api::scheduler::spawn_periodic_refresh;
use crate::version::refresh::Refresher;

/// Serve the API on `bind` until Ctrl-C, with an optional periodic refresh
pub async fn run_server(
    bind: &str,
    refresher: Arc<Refresher>,
    refresh_secret: Option<String>,
    refresh_interval: Option<Duration>,
) -> anyhow::Result<()> {
    if refresh_secret.as_deref().is_none_or(str::is_empty) {
        warn!("REFRESH_SECRET is not set; POST /api/refresh will reject every request");
    }

    let scheduler = refresh_interval.map(|period| spawn_periodic_refresh(refresher.clone(), period));

    let package = refresher.package_name().to_string();
    let mirrors = refresher.mirrors().len();
    let state = Arc::new(AppState::new(refresher, refresh_secret));
    let app = router(state);

    let listener = TcpListener::bind(bind).await?;
    info!(
        "Serving {} ({} mirrors) on {}",
        package,
        mirrors,
        listener.local_addr()?
    );
    info!("  GET  /api/info     - Cached version information");
    info!("  GET  /api/v2/info  - Alias of /api/info");
    info!("  POST /api/refresh  - Refresh version information (bearer token)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = scheduler {
        handle.abort();
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
