//! Logging macros with `format!`-style arguments.
//!
//! # Examples
//!
//! ```no_run
//! use rotalog::prelude::*;
//! use rotalog::{error, info};
//!
//! let logger = Logger::init("logs.txt", Severity::Info).unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! error!(logger, "Request {} failed: {}", 17, "timeout");
//!
//! logger.shutdown();
//! ```

/// Log a message at an explicit severity.
///
/// ```no_run
/// # use rotalog::prelude::*;
/// # let logger = Logger::init("logs.txt", Severity::Info).unwrap();
/// use rotalog::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log($severity, format!($($arg)+))
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```no_run
/// # use rotalog::prelude::*;
/// # let logger = Logger::init("logs.txt", Severity::Info).unwrap();
/// use rotalog::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}
