//! Runtime configuration for storage and logging.
//!
//! # Responsibility
//! - Resolve where tasks are stored and under which key.
//! - Normalize logging options before they reach the logger backend.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; invalid logging input is reported by
//!   `LoggingConfig::new` instead.

use std::path::{Path, PathBuf};

/// Storage key holding the serialized task array.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";
/// File name of the default database, placed in the system temp dir.
pub const DEFAULT_DB_FILE_NAME: &str = "tasklist_store.sqlite3";

pub const DB_PATH_ENV: &str = "TASKLIST_DB_PATH";
pub const STORAGE_KEY_ENV: &str = "TASKLIST_STORAGE_KEY";

/// Where and under which key the task store persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Resolves configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: non_blank(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            storage_key: non_blank(STORAGE_KEY_ENV).unwrap_or(defaults.storage_key),
        }
    }
}

/// Validated logging options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Normalizes `level` and validates `log_dir`.
    ///
    /// # Errors
    /// - Unsupported level names.
    /// - Empty or relative directories.
    pub fn new(level: &str, log_dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: normalize_log_dir(log_dir)?,
        })
    }
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err("log_dir cannot be empty".to_string());
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::{
        default_log_level, LoggingConfig, StoreConfig, DB_PATH_ENV, DEFAULT_STORAGE_KEY,
        STORAGE_KEY_ENV,
    };
    use std::path::PathBuf;

    #[test]
    fn lookup_overrides_defaults() {
        let config = StoreConfig::from_lookup(|name| match name {
            DB_PATH_ENV => Some(" /var/lib/tasks.db ".to_string()),
            STORAGE_KEY_ENV => Some("work-tasks".to_string()),
            _ => None,
        });
        assert_eq!(config.db_path, PathBuf::from("/var/lib/tasks.db"));
        assert_eq!(config.storage_key, "work-tasks");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = StoreConfig::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn logging_config_normalizes_level() {
        let dir = std::env::temp_dir();
        let config = LoggingConfig::new(" WARNING ", dir.to_str().unwrap()).unwrap();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn default_level_is_accepted_as_is() {
        let config = LoggingConfig::new(default_log_level(), "/tmp").unwrap();
        assert_eq!(config.level, default_log_level());
    }

    #[test]
    fn logging_config_rejects_relative_dir() {
        let error = LoggingConfig::new("info", "logs/dev").unwrap_err();
        assert!(error.contains("absolute"));
    }

    #[test]
    fn logging_config_rejects_unknown_level() {
        let error = LoggingConfig::new("verbose", "/tmp").unwrap_err();
        assert!(error.contains("unsupported log level"));
    }
}
