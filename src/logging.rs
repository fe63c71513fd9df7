//! File-backed tracing setup. The terminal belongs to the TUI for the whole
//! session, so log lines go to `records-tui.log` in the data directory.

use std::fs;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, LOG_FILE_NAME};

pub fn init_logging(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.data_dir).context("failed to create data directory")?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter `{}`", config.log_filter))?;
    let appender = tracing_appender::rolling::never(&config.data_dir, LOG_FILE_NAME);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(appender).with_ansi(false))
        .try_init()
        .context("failed to install log subscriber")?;

    Ok(())
}
