//! Runtime configuration.
//!
//! Loads settings from `QUOTEBOOK_*` environment variables after reading an
//! optional `.env` file. Every setting has a default.

use crate::logging::default_log_level;
use crate::sync::remote::{DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "QUOTEBOOK_DB_PATH";
pub const ENV_ENDPOINT: &str = "QUOTEBOOK_ENDPOINT";
pub const ENV_SYNC_INTERVAL_SECS: &str = "QUOTEBOOK_SYNC_INTERVAL_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "QUOTEBOOK_REQUEST_TIMEOUT_SECS";
pub const ENV_FETCH_LIMIT: &str = "QUOTEBOOK_FETCH_LIMIT";
pub const ENV_LOG_LEVEL: &str = "QUOTEBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "QUOTEBOOK_LOG_DIR";

const DEFAULT_SYNC_INTERVAL_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DB_FILE_NAME: &str = "quotebook.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Durable SQLite file holding quote and filter slots.
    pub db_path: PathBuf,
    pub endpoint: String,
    pub sync_interval: Duration,
    /// Applied to every fetch and push.
    pub request_timeout: Duration,
    pub fetch_limit: usize,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sync_interval: Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            fetch_limit: DEFAULT_FETCH_LIMIT,
            log_level: default_log_level().to_string(),
            log_dir: data_dir.join(LOG_DIR_NAME),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Builds configuration from explicit key/value pairs.
    pub fn from_vars(
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let vars = vars
            .into_iter()
            .filter(|(key, value)| key.starts_with("QUOTEBOOK_") && !value.trim().is_empty())
            .collect::<HashMap<_, _>>();
        let mut config = Self::default();

        if let Some(path) = vars.get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path.trim());
        }
        if let Some(endpoint) = vars.get(ENV_ENDPOINT) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(value) = vars.get(ENV_SYNC_INTERVAL_SECS) {
            config.sync_interval =
                Duration::from_secs(parse_positive(ENV_SYNC_INTERVAL_SECS, value)?);
        }
        if let Some(value) = vars.get(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout =
                Duration::from_secs(parse_positive(ENV_REQUEST_TIMEOUT_SECS, value)?);
        }
        if let Some(value) = vars.get(ENV_FETCH_LIMIT) {
            config.fetch_limit = parse_positive(ENV_FETCH_LIMIT, value)? as usize;
        }
        if let Some(level) = vars.get(ENV_LOG_LEVEL) {
            config.log_level = level.trim().to_string();
        }
        if let Some(dir) = vars.get(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir.trim());
        }

        Ok(config)
    }
}

/// Returns `data_dir/quotebook`, or `./quotebook` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("quotebook");
    path
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError, ENV_FETCH_LIMIT, ENV_SYNC_INTERVAL_SECS};
    use std::path::PathBuf;
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = AppConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.sync_interval, Duration::from_secs(60));
        assert!(config.db_path.ends_with("quotebook.sqlite3"));
    }

    #[test]
    fn overrides_are_trimmed_and_applied() {
        let config = AppConfig::from_vars(vars(&[
            ("QUOTEBOOK_DB_PATH", " /tmp/q.sqlite3 "),
            ("QUOTEBOOK_ENDPOINT", "http://localhost:9000/posts"),
            ("QUOTEBOOK_SYNC_INTERVAL_SECS", "5"),
            ("QUOTEBOOK_FETCH_LIMIT", "3"),
            ("UNRELATED", "ignored"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/q.sqlite3"));
        assert_eq!(config.endpoint, "http://localhost:9000/posts");
        assert_eq!(config.sync_interval, Duration::from_secs(5));
        assert_eq!(config.fetch_limit, 3);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = AppConfig::from_vars(vars(&[(ENV_SYNC_INTERVAL_SECS, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: ENV_SYNC_INTERVAL_SECS,
                value: "0".to_string()
            }
        );
        assert!(AppConfig::from_vars(vars(&[(ENV_FETCH_LIMIT, "many")])).is_err());
    }
}
