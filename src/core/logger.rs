//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::Result,
    metrics::LoggerMetrics,
    record::LogRecord,
    severity::Severity,
    worker::{Command, Worker},
};
use crate::appenders::{ConsoleAppender, RotatingFileAppender};
use crossbeam_channel::{unbounded, Sender};
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Asynchronous logger writing to a rotated file and the console
///
/// Every instance owns exactly one background worker. `log` formats the record
/// on the calling thread, queues it and returns; the worker performs all I/O.
/// `Logger` is `Send + Sync`, so share it by reference, through an `Arc`, or
/// via the process-wide accessor in [`crate::global`].
///
/// # Example
///
/// ```no_run
/// use rotalog::{Logger, Severity};
///
/// let logger = Logger::init("my_app_logs.txt", Severity::Info).unwrap();
///
/// std::thread::scope(|s| {
///     s.spawn(|| logger.warning("Disk space low"));
///     s.spawn(|| logger.error("Fatal error occurred"));
/// });
///
/// logger.shutdown();
/// ```
pub struct Logger {
    min_severity: RwLock<Severity>,
    sender: Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Held for reading across every submission; shutdown takes it for
    /// writing, so no accepted record can be queued behind the exit signal
    accepting: RwLock<bool>,
    /// Counters shared with the worker
    metrics: Arc<LoggerMetrics>,
    path: PathBuf,
}

impl Logger {
    /// Open `path` in append mode and start the background worker
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the worker cannot be
    /// spawned. Use [`crate::global::init`] for the terminate-on-failure variant.
    pub fn init(path: impl Into<PathBuf>, min_severity: Severity) -> Result<Self> {
        Self::with_config(LoggerConfig::new(path, min_severity))
    }

    /// Start a logger from a full configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the file cannot be
    /// opened, or the worker cannot be spawned.
    pub fn with_config(config: LoggerConfig) -> Result<Self> {
        Self::start(config, None)
    }

    fn start(config: LoggerConfig, console_writer: Option<Box<dyn Write + Send>>) -> Result<Self> {
        config.validate()?;

        let file = RotatingFileAppender::open(&config)?;
        let console = if config.console {
            Some(match console_writer {
                Some(writer) => ConsoleAppender::with_writer(writer, config.use_colors),
                None => ConsoleAppender::stdout(config.use_colors),
            })
        } else {
            None
        };

        let (sender, receiver) = unbounded();
        let metrics = Arc::new(LoggerMetrics::new());
        let handle = Worker::new(receiver, file, console, Arc::clone(&metrics)).spawn()?;

        Ok(Self {
            min_severity: RwLock::new(config.min_severity),
            sender,
            worker: Mutex::new(Some(handle)),
            accepting: RwLock::new(true),
            metrics,
            path: config.path,
        })
    }

    /// Queue a message for writing
    ///
    /// Never blocks on I/O and never fails visibly. The message is dropped
    /// silently when `severity` is below the minimum or the logger has been
    /// shut down.
    pub fn log(&self, severity: Severity, message: impl AsRef<str>) {
        let accepting = self.accepting.read();
        if !*accepting {
            self.metrics.record_rejected_after_shutdown();
            return;
        }
        if severity < *self.min_severity.read() {
            self.metrics.record_filtered();
            return;
        }

        let record = LogRecord::new(severity, message.as_ref());
        if self.sender.send(Command::Record(record)).is_err() {
            // Worker already gone
            self.metrics.record_rejected_after_shutdown();
        }
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Severity::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Severity::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Severity::Error, message);
    }

    /// Drain the queue, stop the worker and close the file
    ///
    /// Blocks until every record queued before this call has been written.
    /// Only the first call does any work; later calls return immediately.
    pub fn shutdown(&self) {
        {
            let mut accepting = self.accepting.write();
            if !*accepting {
                return;
            }
            *accepting = false;
        }

        // The worker may already be gone if it panicked; nothing to signal then
        let _ = self.sender.send(Command::Shutdown);

        if let Some(handle) = self.worker.lock().take() {
            if let Err(e) = handle.join() {
                eprintln!("[LOGGER ERROR] Log worker panicked during shutdown: {:?}", e);
            }
        }

        let failures = self.metrics.write_failures();
        if failures > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shut down with {} failed writes (failure rate: {:.2}%)",
                failures,
                self.metrics.failure_rate()
            );
        }
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        !*self.accepting.read()
    }

    pub fn set_min_severity(&self, severity: Severity) {
        *self.min_severity.write() = severity;
    }

    #[must_use]
    pub fn min_severity(&self) -> Severity {
        *self.min_severity.read()
    }

    /// Path of the active log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counters for written, filtered and failed records
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rotalog::{Logger, Severity};
    ///
    /// let logger = Logger::init("app.txt", Severity::Warning).unwrap();
    /// logger.info("filtered out");
    /// logger.shutdown();
    ///
    /// assert_eq!(logger.metrics().filtered(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Drop for Logger {
    /// Safety net only; call [`Logger::shutdown`] explicitly for a timely flush
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```no_run
/// use rotalog::prelude::*;
///
/// let logger = Logger::builder()
///     .path("service.txt")
///     .min_severity(Severity::Warning)
///     .max_file_size(1024 * 1024)
///     .colors(false)
///     .build()
///     .unwrap();
/// # logger.shutdown();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    console_writer: Option<Box<dyn Write + Send>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            console_writer: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.path = path.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_severity(mut self, severity: Severity) -> Self {
        self.config.min_severity = severity;
        self
    }

    /// Rotation threshold in bytes
    #[must_use = "builder methods return a new value"]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.config.max_file_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn archive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.archive_prefix = prefix.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn archive_extension(mut self, extension: impl Into<String>) -> Self {
        self.config.archive_extension = extension.into();
        self
    }

    /// Enable or disable the console mirror
    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.config.use_colors = enabled;
        self
    }

    /// Send console output to `writer` instead of stdout
    #[must_use = "builder methods return a new value"]
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.console_writer = Some(Box::new(writer));
        self
    }

    /// Open the file and start the worker
    ///
    /// # Errors
    ///
    /// See [`Logger::with_config`].
    pub fn build(self) -> Result<Logger> {
        Logger::start(self.config, self.console_writer)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
