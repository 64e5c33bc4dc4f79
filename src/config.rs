#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{path::PathBuf, sync::OnceLock, time::Duration};

use crate::constants::DEFAULT_TIMEOUT_SECS;

/// Runtime settings read from the environment once per process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hard deadline applied to each student's evaluation worker.
    pub timeout: Duration,
    /// Interpreter override, if `AUTOGRADE_PYTHON` is set.
    pub python:  Option<PathBuf>,
}

impl Config {
    /// Builds the configuration from environment-provided values.
    fn from_env() -> Self {
        let timeout = std::env::var("AUTOGRADE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let python = std::env::var("AUTOGRADE_PYTHON")
            .ok()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Self {
            timeout: Duration::from_secs(timeout),
            python,
        }
    }
}

/// Process-wide configuration cell.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Returns the process-wide configuration, reading the environment on first
/// use.
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
