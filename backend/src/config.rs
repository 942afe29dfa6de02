use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::domain::DEFAULT_REPORT_FILE;
use crate::storage::DEFAULT_DATABASE_URL;

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings resolved from the command line, the environment and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub report_path: PathBuf,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        Self {
            database_url: non_empty(cli.database.clone()).unwrap_or(defaults.database_url),
            report_path: cli
                .report_file
                .clone()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(defaults.report_path),
            log_filter: non_empty(cli.log_level.clone()).unwrap_or(defaults.log_filter),
        }
    }

    /// `RUST_LOG` when set, otherwise the configured filter
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.log_filter))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
