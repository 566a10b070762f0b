//! Timestamp formatting for record lines and archive names
//!
//! Record lines carry a local wall-clock time with second precision
//! (`2025-01-08 10:30:45`). Archived files embed a filesystem-safe variant of
//! the same instant (`2025-01-08_10-30-45`) which sorts lexicographically in
//! chronological order.

use chrono::{DateTime, Local, NaiveDateTime};

/// strftime pattern used inside each record line
pub const RECORD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// strftime pattern embedded in rotated file names
pub const ARCHIVE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Length of a rendered [`ARCHIVE_FORMAT`] stamp
pub const ARCHIVE_STAMP_LEN: usize = 19;

/// Format a local time for a record line
#[must_use]
pub fn record_stamp(datetime: &DateTime<Local>) -> String {
    datetime.format(RECORD_FORMAT).to_string()
}

/// Format a local time for an archive file name
#[must_use]
pub fn archive_stamp(datetime: &DateTime<Local>) -> String {
    datetime.format(ARCHIVE_FORMAT).to_string()
}

/// Parse an archive stamp back into a calendar time
///
/// Returns `None` if `stamp` is not exactly an [`ARCHIVE_FORMAT`] rendering.
#[must_use]
pub fn parse_archive_stamp(stamp: &str) -> Option<NaiveDateTime> {
    if stamp.len() != ARCHIVE_STAMP_LEN {
        return None;
    }
    NaiveDateTime::parse_from_str(stamp, ARCHIVE_FORMAT).ok()
}
