//! # Rotalog
//!
//! An in-process asynchronous logger with two fixed sinks: a size-rotated file
//! and the console.
//!
//! ## Features
//!
//! - **Non-blocking**: `log` formats and queues; a single background worker does all I/O
//! - **Ordered**: records from one thread are written in submission order
//! - **Rotation**: the active file is archived as `logs_<YYYY-MM-DD_HH-MM-SS>.txt`
//!   once it grows beyond a size threshold (5 MiB by default)
//! - **Lossless shutdown**: `shutdown` drains everything queued before it, and is idempotent
//!
//! ```no_run
//! use rotalog::prelude::*;
//!
//! let logger = Logger::init("logs.txt", Severity::Info)?;
//! logger.info("Application started");
//! rotalog::warning!(logger, "Disk space low: {}%", 7);
//! logger.shutdown();
//! # Ok::<(), LoggerError>(())
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result,
        Severity, DEFAULT_MAX_FILE_SIZE,
    };
}

pub use core::{
    LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Result, Severity,
    DEFAULT_ARCHIVE_EXTENSION, DEFAULT_ARCHIVE_PREFIX, DEFAULT_LOG_PATH, DEFAULT_MAX_FILE_SIZE,
};
