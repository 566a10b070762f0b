//! Process-wide logger
//!
//! A thin convenience layer over a single [`Logger`] stored in a `OnceLock`.
//! Nothing in the core depends on it; pass a `Logger` explicitly where you can.
//!
//! * [`init`] treats an unopenable log file as unrecoverable and terminates the
//!   process with exit status 1. Use [`try_init`] to handle the error instead.
//! * Logging before `init` is a silent no-op.
//! * Statics are never dropped, so call [`shutdown`] before the process exits
//!   or queued records may be lost.
//!
//! ```no_run
//! use rotalog::{global, Severity};
//!
//! global::init("my_app_logs.txt", Severity::Info);
//! global::info("Main thread: Application started");
//! global::shutdown();
//! ```

use crate::core::{Logger, LoggerConfig, LoggerError, Result, Severity};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Held for the whole of `try_init`, so at most one logger is ever started
static INIT: Mutex<()> = parking_lot::const_mutex(());

/// Initialize the process-wide logger, exiting the process if the file cannot be opened
///
/// A second call is ignored with a diagnostic on stderr.
pub fn init(path: impl Into<PathBuf>, min_severity: Severity) {
    init_with_config(LoggerConfig::new(path, min_severity));
}

/// [`init`] with a full configuration
pub fn init_with_config(config: LoggerConfig) {
    match try_init(config) {
        Ok(()) => {}
        Err(LoggerError::AlreadyInitialized) => {
            eprintln!("[LOGGER WARNING] Global logger already initialized; ignoring init");
        }
        Err(e) => {
            eprintln!("[LOGGER ERROR] {}", e);
            std::process::exit(1);
        }
    }
}

/// Initialize the process-wide logger, returning failures to the caller
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] on a second call, or the
/// error from [`Logger::with_config`].
pub fn try_init(config: LoggerConfig) -> Result<()> {
    let _guard = INIT.lock();
    if GLOBAL.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let logger = Logger::with_config(config)?;
    GLOBAL
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// The process-wide logger, if initialized
pub fn get() -> Option<&'static Logger> {
    GLOBAL.get()
}

pub fn log(severity: Severity, message: impl AsRef<str>) {
    if let Some(logger) = GLOBAL.get() {
        logger.log(severity, message);
    }
}

pub fn info(message: impl AsRef<str>) {
    log(Severity::Info, message);
}

pub fn warning(message: impl AsRef<str>) {
    log(Severity::Warning, message);
}

pub fn error(message: impl AsRef<str>) {
    log(Severity::Error, message);
}

/// Drain and stop the process-wide logger; idempotent
///
/// The logger stays installed in its shut-down state, so later `log` calls
/// are no-ops and a later `init` is ignored.
pub fn shutdown() {
    if let Some(logger) = GLOBAL.get() {
        logger.shutdown();
    }
}
