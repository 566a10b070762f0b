//! Formatted log records

use super::severity::Severity;
use super::timestamp;
use chrono::{DateTime, Local};

/// A single fully formatted log line.
///
/// The line has the shape `[YYYY-MM-DD HH:MM:SS] [SEVERITY] message` and is
/// stored without a trailing newline. Records are immutable; they move from the
/// producer into the queue and from the queue into the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    severity: Severity,
    line: String,
}

impl LogRecord {
    /// Sanitize a message body so a record always occupies exactly one line
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent callers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    /// Format a record stamped with the current local time
    pub fn new(severity: Severity, message: &str) -> Self {
        Self::at(severity, message, &Local::now())
    }

    /// Format a record stamped with `time`
    pub fn at(severity: Severity, message: &str, time: &DateTime<Local>) -> Self {
        let line = format!(
            "[{}] [{}] {}",
            timestamp::record_stamp(time),
            severity,
            Self::sanitize_message(message)
        );
        Self { severity, line }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The formatted line, without the trailing newline
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Number of bytes this record occupies on disk, newline included
    pub fn encoded_len(&self) -> usize {
        self.line.len() + 1
    }
}
