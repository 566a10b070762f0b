//! Logger configuration
//!
//! A [`LoggerConfig`] describes everything the logger needs at init time. It
//! can be built in code, through [`LoggerBuilder`](super::logger::LoggerBuilder),
//! or loaded from JSON. Missing JSON fields take their defaults.
//!
//! ```
//! use rotalog::{LoggerConfig, Severity};
//!
//! let config = LoggerConfig::from_json_str(
//!     r#"{ "path": "service.txt", "min_severity": "WARNING" }"#,
//! ).unwrap();
//!
//! assert_eq!(config.min_severity, Severity::Warning);
//! assert_eq!(config.max_file_size, rotalog::DEFAULT_MAX_FILE_SIZE);
//! ```

use super::error::{LoggerError, Result};
use super::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Path of the active log file when none is given
pub const DEFAULT_LOG_PATH: &str = "logs.txt";

/// Size above which the active file is rotated (5 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// File name prefix of rotated archives
pub const DEFAULT_ARCHIVE_PREFIX: &str = "logs_";

/// File extension of rotated archives
pub const DEFAULT_ARCHIVE_EXTENSION: &str = "txt";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Active log file, opened in append mode
    pub path: PathBuf,
    /// Records below this severity are dropped silently
    pub min_severity: Severity,
    /// Rotate once the active file grows beyond this many bytes
    pub max_file_size: u64,
    pub archive_prefix: String,
    pub archive_extension: String,
    /// Mirror every record to the console
    pub console: bool,
    /// Colour console lines by severity
    pub use_colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_PATH),
            min_severity: Severity::Info,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            console: true,
            use_colors: true,
        }
    }
}

impl LoggerConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, min_severity: Severity) -> Self {
        Self {
            path: path.into(),
            min_severity,
            ..Self::default()
        }
    }

    /// Parse a configuration from a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or is invalid.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Check that the configuration can drive a logger
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "path must not be empty"));
        }
        if self.max_file_size == 0 {
            return Err(LoggerError::config(
                "LoggerConfig",
                "max_file_size must be greater than zero",
            ));
        }
        Self::validate_name_part("archive_prefix", &self.archive_prefix)?;
        Self::validate_name_part("archive_extension", &self.archive_extension)?;
        Ok(())
    }

    fn validate_name_part(field: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("{} must not be empty", field),
            ));
        }
        if value.contains(|c| c == '/' || c == '\\') {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!("{} must not contain a path separator", field),
            ));
        }
        Ok(())
    }
}
