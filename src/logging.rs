//! File logging. The terminal belongs to the UI, so events go to a log file
//! in the platform data directory instead of stderr.

use std::fs;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{log_dir, Config, APP_NAME};

/// Install the global subscriber. The returned guard flushes the log file on
/// drop and must live until the program exits. Returns `None` when there is
/// no data directory to log into.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir() else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).context("failed to create log directory")?;

    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log level `{}`", config.log_level))?;
    let appender = tracing_appender::rolling::never(&dir, format!("{APP_NAME}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))?;

    tracing::info!(log_dir = %dir.display(), "logging started");
    Ok(Some(guard))
}
