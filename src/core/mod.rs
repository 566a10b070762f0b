//! Core logger types: records, severities, configuration and the lifecycle

pub mod config;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod severity;
pub mod timestamp;
pub(crate) mod worker;

pub use config::{
    LoggerConfig, DEFAULT_ARCHIVE_EXTENSION, DEFAULT_ARCHIVE_PREFIX, DEFAULT_LOG_PATH,
    DEFAULT_MAX_FILE_SIZE,
};
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::LogRecord;
pub use severity::Severity;
