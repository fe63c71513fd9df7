//! Runtime configuration. Defaults live in constants; a handful of
//! environment variables override them so tests and power users can point the
//! app somewhere else without a config file.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".records-tui";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "records.sqlite";
/// Log file written next to the database.
pub const LOG_FILE_NAME: &str = "records-tui.log";
const DEFAULT_LOG_FILTER: &str = "info";

pub const DATA_DIR_ENV: &str = "RECORDS_TUI_DATA_DIR";
pub const LOG_FILTER_ENV: &str = "RECORDS_TUI_LOG";
pub const MESSAGE_DELAY_ENV: &str = "RECORDS_TUI_MESSAGE_MS";
pub const STATS_DELAY_ENV: &str = "RECORDS_TUI_STATS_MS";

/// How long the transient screens stay up before returning on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub message_delay: Duration,
    pub stats_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            message_delay: Duration::from_millis(1500),
            stats_delay: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Holds the database and the log file.
    pub data_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
    pub timing: Timing,
}

impl Config {
    /// Resolve the configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup. Blank
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = match lookup(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        let log_filter = lookup(LOG_FILTER_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let defaults = Timing::default();
        let timing = Timing {
            message_delay: parse_millis(lookup(MESSAGE_DELAY_ENV), MESSAGE_DELAY_ENV)?
                .unwrap_or(defaults.message_delay),
            stats_delay: parse_millis(lookup(STATS_DELAY_ENV), STATS_DELAY_ENV)?
                .unwrap_or(defaults.stats_delay),
        };

        Ok(Self {
            data_dir,
            log_filter,
            timing,
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

/// Resolve `~/.records-tui`.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

fn parse_millis(raw: Option<String>, key: &str) -> Result<Option<Duration>> {
    raw.map(|value| {
        value
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .with_context(|| format!("{key} must be a whole number of milliseconds"))
    })
    .transpose()
}
