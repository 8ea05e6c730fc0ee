//! Environment configuration, read once per cold start.

use change_observer_atoms::ErrorStatusMode;
use thiserror::Error;

pub const TABLE_NAME_VAR: &str = "TABLE_NAME";
pub const ERROR_STATUS_MODE_VAR: &str = "ERROR_STATUS_MODE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
}

/// Settings shared by every marker Lambda.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Markers table; `None` when `TABLE_NAME` is unset or empty.
    pub table_name: Option<String>,
    pub error_status_mode: ErrorStatusMode,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, so tests need not touch process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let table_name = lookup(TABLE_NAME_VAR)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let error_status_mode = match lookup(ERROR_STATUS_MODE_VAR) {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(
                    value = %raw,
                    error = %e,
                    "falling back to legacy error status mode"
                );
                ErrorStatusMode::Legacy
            }),
            None => ErrorStatusMode::Legacy,
        };

        Self {
            table_name,
            error_status_mode,
        }
    }

    pub fn table_name(&self) -> Result<&str, ConfigError> {
        self.table_name
            .as_deref()
            .ok_or(ConfigError::Missing(TABLE_NAME_VAR))
    }
}
