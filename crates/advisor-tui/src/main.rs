//! `advisor` - terminal chat client for the AdvisorOP backend.

mod app;
mod composer;
mod logging;
mod rich;
mod runner;
mod terminal;
mod ui;

use advisor_application::ChatController;
use advisor_core::session::ChatBackend;
use advisor_infrastructure::{AdvisorPaths, ConfigService, HttpChatBackend};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "AdvisorOP - AI reasoning & therapy guide in your terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Directory holding config.toml and logs
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Log filter directive (overrides RUST_LOG, ADVISOR_LOG and config)
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let paths = AdvisorPaths::new(args.config_dir);
    let config_service = ConfigService::new(&paths)?;
    let mut config = config_service
        .get_config()
        .with_context(|| format!("Failed to read {}", config_service.path().display()))?;
    if let Some(base_url) = args.base_url {
        config.server.base_url = base_url;
    }

    let log_dir = paths.log_dir(config.logging.directory.as_deref())?;
    let _log_guard = logging::init(&log_dir, args.log_level.as_deref(), &config.logging.level)?;
    tracing::info!(
        "[Startup] AdvisorOP client {} using {}",
        env!("CARGO_PKG_VERSION"),
        config.server.base_url
    );

    let backend = Arc::new(HttpChatBackend::from_config(&config.server)?);
    match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, backend.health()).await {
        Ok(Ok(health)) if health.is_healthy() => {
            tracing::info!("[Startup] Backend {} is healthy", health.service)
        }
        Ok(Ok(health)) => tracing::warn!("[Startup] Backend reports status '{}'", health.status),
        Ok(Err(e)) => tracing::warn!("[Startup] Backend health check failed: {}", e),
        Err(_) => tracing::warn!("[Startup] Backend health check timed out"),
    }

    let controller = ChatController::new(backend);
    runner::run(controller, &config.ui).await?;

    tracing::info!("[Shutdown] Bye");
    Ok(())
}
