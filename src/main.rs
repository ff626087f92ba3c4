use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use cdn_version_api::api::server::run_server;
use cdn_version_api::config::{self, AppConfig};
use cdn_version_api::version::cache::Cache;
use cdn_version_api::version::probe::HttpMirrorClient;
use cdn_version_api::version::refresh::Refresher;
use cdn_version_api::version::registries::NpmRegistry;

#[derive(Parser)]
#[command(name = "cdn-version-api")]
#[command(version, about = "Package version and CDN availability API")]
struct Cli {
    /// JSON configuration file
    #[arg(long, env = "CDN_VERSION_API_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// SQLite database holding the cached record
    #[arg(long, env = "VERSION_CACHE_PATH", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve {
        /// Listen address, overrides the configured one
        #[arg(long)]
        bind: Option<String>,

        /// Bearer token required by POST /api/refresh
        #[arg(long, env = "REFRESH_SECRET", hide_env_values = true)]
        refresh_secret: Option<String>,
    },
    /// Refresh the cached record once and exit, for use from cron
    Refresh,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = cdn_version_api::log::init()?;

    let config = AppConfig::load(cli.config.as_deref())?;
    let db_path = cli.db.unwrap_or_else(config::db_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let refresher = Arc::new(Refresher::new(
        Arc::new(NpmRegistry::new(&config.package.registry_url)),
        Arc::new(HttpMirrorClient::new()),
        Arc::new(Cache::new(&db_path)?),
        &config,
    ));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None => runtime.block_on(run_server(
            &config.bind,
            refresher,
            std::env::var("REFRESH_SECRET").ok(),
            refresh_interval(&config),
        )),
        Some(Command::Serve {
            bind,
            refresh_secret,
        }) => runtime.block_on(run_server(
            bind.as_deref().unwrap_or(&config.bind),
            refresher,
            refresh_secret,
            refresh_interval(&config),
        )),
        Some(Command::Refresh) => runtime.block_on(async {
            refresher.refresh().await?;
            Ok::<(), anyhow::Error>(())
        }),
    }
}

fn refresh_interval(config: &AppConfig) -> Option<Duration> {
    (config.refresh_interval > 0).then(|| Duration::from_millis(config.refresh_interval))
}
