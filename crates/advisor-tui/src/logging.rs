//! File logging for the terminal UI.
//!
//! The terminal belongs to the UI, so log output goes to a daily-rolling file.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_PREFIX: &str = "advisor.log";

/// Installs the global subscriber writing to `<dir>/advisor.log.YYYY-MM-DD`.
///
/// See [`filter_directive`] for how `cli_level`, `RUST_LOG` and `configured`
/// combine. The returned guard flushes buffered lines when dropped and must
/// live until exit.
pub fn init(dir: &Path, cli_level: Option<&str>, configured: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(cli_level, rust_log.as_deref(), configured);
    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(advisor_core::config::DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()?;

    Ok(guard)
}

/// Picks the filter directive: `--log-level`, then `RUST_LOG`, then the
/// configured level (file or `ADVISOR_LOG`). Blank values are skipped.
pub fn filter_directive(cli: Option<&str>, rust_log: Option<&str>, configured: &str) -> String {
    [cli, rust_log, Some(configured)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or(advisor_core::config::DEFAULT_LOG_LEVEL)
        .to_string()
}
