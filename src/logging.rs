// Tracing setup for the proxy (stdout) and the terminal client (log file)

use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the level given on the command line.
fn env_filter(default_level: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Failed to create tracing filter")
}

pub fn init_stdout(default_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(env_filter(default_level)?)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(())
}

/// Log to `log_path` so the terminal stays free for the UI.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_file(default_level: &str, log_path: &Path) -> Result<WorkerGuard> {
    let directory = log_path
        .parent()
        .context("Log path has no parent directory")?;
    let file_name = log_path
        .file_name()
        .context("Log path has no file name")?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .with(env_filter(default_level)?)
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(guard)
}
