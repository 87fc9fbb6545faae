//! Tracker configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `LANTERNLOG_DATA_DIR` | `./lanternlog-data` |
//! | `LANTERNLOG_STORAGE_KEY` | `campaign` |
//! | `LANTERNLOG_DEBOUNCE_MS` | `300` |
//! | `LANTERNLOG_MAX_REPORTED_ISSUES` | `10` |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use lanternlog_domain::DEFAULT_REPORT_LIMIT;

pub const DEFAULT_DATA_DIR: &str = "./lanternlog-data";
pub const DEFAULT_STORAGE_KEY: &str = "campaign";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Directory used by the file-backed storage adapter.
    pub data_dir: PathBuf,
    /// Key the campaign document is stored under.
    pub storage_key: String,
    /// Delay before a coalesced save is written.
    pub debounce: Duration,
    /// Cap on issues shown when an import is rejected.
    pub max_reported_issues: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            max_reported_issues: DEFAULT_REPORT_LIMIT,
        }
    }
}

impl TrackerConfig {
    /// Reads the process environment after loading any `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        // A missing .env file is fine; values may come from the shell.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let data_dir = value("LANTERNLOG_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let storage_key = value("LANTERNLOG_STORAGE_KEY").unwrap_or(defaults.storage_key);
        let debounce = match value("LANTERNLOG_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(raw.parse::<u64>().with_context(|| {
                format!("LANTERNLOG_DEBOUNCE_MS must be milliseconds, got {raw:?}")
            })?),
            None => defaults.debounce,
        };
        let max_reported_issues = match value("LANTERNLOG_MAX_REPORTED_ISSUES") {
            Some(raw) => raw.parse::<usize>().with_context(|| {
                format!("LANTERNLOG_MAX_REPORTED_ISSUES must be a whole number, got {raw:?}")
            })?,
            None => defaults.max_reported_issues,
        };

        Ok(Self {
            data_dir,
            storage_key,
            debounce,
            max_reported_issues,
        })
    }
}
