//! Size-rotated file sink
//!
//! The active file is appended to until, measured just before a write, it is
//! larger than the configured threshold. It is then closed, renamed to
//! `<prefix><YYYY-MM-DD_HH-MM-SS>.<ext>` next to the active file, and the
//! configured path is reopened fresh. When two rotations land in the same
//! second the later archive gets a numeric suffix (`_1`, `_2`, ...), so an
//! archive is never overwritten.

use crate::core::config::LoggerConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::record::LogRecord;
use crate::core::timestamp;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File appender that archives the active file once it exceeds a size limit
///
/// Owned exclusively by the background worker; nothing else touches the file.
///
/// # Examples
///
/// ```no_run
/// use rotalog::appenders::RotatingFileAppender;
/// use rotalog::{LogRecord, LoggerConfig, Severity};
///
/// let config = LoggerConfig {
///     max_file_size: 1024,
///     ..LoggerConfig::new("/var/log/app.txt", Severity::Info)
/// };
/// let mut appender = RotatingFileAppender::open(&config).unwrap();
///
/// appender.rotate_if_needed().unwrap();
/// appender.append(&LogRecord::new(Severity::Info, "service started")).unwrap();
/// appender.flush().unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    archive_dir: PathBuf,
    archive_prefix: String,
    archive_extension: String,
    max_file_size: u64,
    writer: Option<BufWriter<File>>,
}

impl RotatingFileAppender {
    /// Open (or create) the configured log file in append mode
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileOpen`] if the file or its directory cannot be created.
    pub fn open(config: &LoggerConfig) -> Result<Self> {
        let base_path = config.path.clone();
        let archive_dir = base_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        if !archive_dir.as_os_str().is_empty() {
            fs::create_dir_all(&archive_dir)
                .map_err(|e| LoggerError::file_open(&base_path, e))?;
        }

        let file = Self::open_append(&base_path).map_err(|e| LoggerError::file_open(&base_path, e))?;

        Ok(Self {
            base_path,
            archive_dir,
            archive_prefix: config.archive_prefix.clone(),
            archive_extension: config.archive_extension.clone(),
            max_file_size: config.max_file_size,
            writer: Some(BufWriter::new(file)),
        })
    }

    fn open_append(path: &Path) -> std::io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// Path of the active log file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Directory rotated archives are written to
    #[must_use]
    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Size of the active file in bytes, after flushing buffered writes
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not open, cannot be flushed, or its
    /// metadata is unavailable.
    pub fn current_size(&mut self) -> Result<u64> {
        let writer = self.writer.as_mut().ok_or_else(|| LoggerError::WriterClosed {
            path: self.base_path.display().to_string(),
        })?;
        writer.flush().map_err(|e| {
            LoggerError::io_operation(
                "measuring log file",
                format!("Failed to flush '{}'", self.base_path.display()),
                e,
            )
        })?;
        let metadata = writer.get_ref().metadata().map_err(|e| {
            LoggerError::io_operation(
                "measuring log file",
                format!("Cannot access metadata of '{}'", self.base_path.display()),
                e,
            )
        })?;
        Ok(metadata.len())
    }

    /// Rotate if the active file has grown beyond the threshold
    ///
    /// Reopens the active path first if an earlier rotation left it closed.
    /// Returns the archive path when a rotation happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the file could not be measured, archived, or
    /// reopened. When the rename fails the original file stays open at its
    /// current size, so the next call tries again.
    pub fn rotate_if_needed(&mut self) -> Result<Option<PathBuf>> {
        if self.writer.is_none() {
            self.reopen()?;
        }
        if self.current_size()? <= self.max_file_size {
            return Ok(None);
        }
        self.rotate().map(Some)
    }

    /// Archive the active file and start a fresh one
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::FileRotation`] if renaming or reopening fails.
    pub fn rotate(&mut self) -> Result<PathBuf> {
        // Explicitly drop writer to release the handle before renaming
        if let Some(mut writer) = self.writer.take() {
            if let Err(e) = writer.flush() {
                eprintln!(
                    "[LOGGER ERROR] Failed to flush '{}' before rotation: {}",
                    self.base_path.display(),
                    e
                );
            }
        }

        let archive = self.next_archive_path(&Local::now());
        let renamed = fs::rename(&self.base_path, &archive).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to archive as '{}': {}", archive.display(), e),
            )
        });

        if let Err(reopen_err) = self.reopen() {
            if let Err(rename_err) = renamed {
                eprintln!("[LOGGER ERROR] {}", rename_err);
            }
            return Err(reopen_err);
        }

        renamed.map(|()| archive)
    }

    fn reopen(&mut self) -> Result<()> {
        let file = Self::open_append(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to reopen log file: {}", e),
            )
        })?;
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    /// Redirect archives, e.g. to a directory that cannot be written
    #[cfg(test)]
    pub(crate) fn set_archive_dir(&mut self, dir: PathBuf) {
        self.archive_dir = dir;
    }

    /// First free archive path for a rotation happening at `now`
    pub(crate) fn next_archive_path(&self, now: &DateTime<Local>) -> PathBuf {
        let stamp = timestamp::archive_stamp(now);
        let mut candidate = self.archive_dir.join(archive_file_name(
            &self.archive_prefix,
            &stamp,
            0,
            &self.archive_extension,
        ));
        let mut counter = 1;
        while candidate.exists() {
            candidate = self.archive_dir.join(archive_file_name(
                &self.archive_prefix,
                &stamp,
                counter,
                &self.archive_extension,
            ));
            counter += 1;
        }
        candidate
    }

    /// Write one record followed by a newline
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not open or the write fails.
    pub fn append(&mut self, record: &LogRecord) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| LoggerError::WriterClosed {
            path: self.base_path.display().to_string(),
        })?;
        writeln!(writer, "{}", record.line()).map_err(|e| {
            LoggerError::io_operation(
                "writing log record",
                format!("Failed to write to '{}'", self.base_path.display()),
                e,
            )
        })
    }

    /// # Errors
    ///
    /// Returns an error if buffered bytes cannot be written out.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::io_operation(
                    "flushing log file",
                    format!("Failed to flush '{}'", self.base_path.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            // Best effort flush - ignore errors during drop
            let _ = writer.flush();
        }
    }
}

/// Build an archive file name; `counter == 0` means no collision suffix
#[must_use]
pub fn archive_file_name(prefix: &str, stamp: &str, counter: u32, extension: &str) -> String {
    if counter == 0 {
        format!("{}{}.{}", prefix, stamp, extension)
    } else {
        format!("{}{}_{}.{}", prefix, stamp, counter, extension)
    }
}

/// Parse an archive file name into its rotation time and collision counter
///
/// Returns `None` for names that were not produced by [`archive_file_name`].
#[must_use]
pub fn parse_archive_name(
    file_name: &str,
    prefix: &str,
    extension: &str,
) -> Option<(NaiveDateTime, u32)> {
    let rest = file_name
        .strip_prefix(prefix)?
        .strip_suffix(extension)?
        .strip_suffix('.')?;
    let stamp = rest.get(..timestamp::ARCHIVE_STAMP_LEN)?;
    let time = timestamp::parse_archive_stamp(stamp)?;

    let tail = rest.get(timestamp::ARCHIVE_STAMP_LEN..)?;
    if tail.is_empty() {
        return Some((time, 0));
    }
    let counter: u32 = tail.strip_prefix('_')?.parse().ok()?;
    (counter > 0).then_some((time, counter))
}

/// List the archives in `dir`, oldest rotation first
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn archived_files(dir: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        LoggerError::io_operation(
            "listing archives",
            format!("Failed to read directory '{}'", dir.display()),
            e,
        )
    })?;

    let mut archives: Vec<((NaiveDateTime, u32), PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let key = parse_archive_name(name.to_str()?, prefix, extension)?;
            Some((key, entry.path()))
        })
        .collect();
    archives.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(archives.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::severity::Severity;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn config_for(path: &Path, max_file_size: u64) -> LoggerConfig {
        LoggerConfig {
            max_file_size,
            ..LoggerConfig::new(path, Severity::Info)
        }
    }

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .earliest()
            .expect("valid local datetime")
    }

    #[test]
    fn test_open_creates_file_and_directory() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("app.txt");

        let mut appender = RotatingFileAppender::open(&config_for(&log_path, 1024)).unwrap();

        assert!(log_path.exists());
        assert_eq!(appender.path(), log_path);
        assert_eq!(appender.archive_dir(), dir.path().join("nested"));
        assert_eq!(appender.current_size().unwrap(), 0);
    }

    #[test]
    fn test_open_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.txt");
        fs::write(&log_path, "previous run\n").unwrap();

        let mut appender = RotatingFileAppender::open(&config_for(&log_path, 1024)).unwrap();
        appender
            .append(&LogRecord::new(Severity::Info, "this run"))
            .unwrap();
        appender.flush().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.starts_with("previous run\n"));
        assert!(content.ends_with("] [INFO] this run\n"));
    }

    #[test]
    fn test_open_fails_on_directory() {
        let dir = tempdir().unwrap();
        let result = RotatingFileAppender::open(&config_for(dir.path(), 1024));
        assert!(matches!(result, Err(LoggerError::FileOpen { .. })));
    }

    #[test]
    fn test_size_reflects_flushed_bytes() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.txt");
        let mut appender = RotatingFileAppender::open(&config_for(&log_path, 1024)).unwrap();

        let record = LogRecord::new(Severity::Warning, "buffered");
        appender.append(&record).unwrap();

        assert_eq!(appender.current_size().unwrap(), record.encoded_len() as u64);
    }

    #[test]
    fn test_no_rotation_at_or_below_threshold() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.txt");
        let record = LogRecord::new(Severity::Info, "exactly at the limit");
        let limit = record.encoded_len() as u64;

        let mut appender = RotatingFileAppender::open(&config_for(&log_path, limit)).unwrap();
        appender.append(&record).unwrap();

        assert_eq!(appender.rotate_if_needed().unwrap(), None);
        assert!(archived_files(dir.path(), "logs_", "txt").unwrap().is_empty());
    }

    #[test]
    fn test_rotation_archives_and_truncates() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.txt");
        let mut appender = RotatingFileAppender::open(&config_for(&log_path, 50)).unwrap();

        for i in 0..3 {
            appender
                .append(&LogRecord::new(Severity::Info, &format!("filler message {}", i)))
                .unwrap();
        }

        let archive = appender
            .rotate_if_needed()
            .unwrap()
            .expect("file above threshold should rotate");

        assert!(archive.exists());
        assert_eq!(archive.parent(), Some(dir.path()));
        let name = archive.file_name().unwrap().to_str().unwrap();
        assert!(parse_archive_name(name, "logs_", "txt").is_some(), "bad name {}", name);
        assert_eq!(fs::read_to_string(&archive).unwrap().lines().count(), 3);

        assert_eq!(appender.current_size().unwrap(), 0);
        assert_eq!(fs::metadata(&log_path).unwrap().len(), 0);
    }

    #[test]
    fn test_collision_gets_numeric_suffix() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.txt");
        let appender = RotatingFileAppender::open(&config_for(&log_path, 50)).unwrap();

        let first = appender.next_archive_path(&fixed_time());
        assert_eq!(first, dir.path().join("logs_2025-03-01_12-00-00.txt"));

        fs::write(&first, "taken").unwrap();
        let second = appender.next_archive_path(&fixed_time());
        assert_eq!(second, dir.path().join("logs_2025-03-01_12-00-00_1.txt"));

        fs::write(&second, "taken").unwrap();
        let third = appender.next_archive_path(&fixed_time());
        assert_eq!(third, dir.path().join("logs_2025-03-01_12-00-00_2.txt"));
    }

    #[test]
    fn test_reopens_after_lost_handle() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.txt");
        let mut appender = RotatingFileAppender::open(&config_for(&log_path, 1024)).unwrap();

        appender.writer = None;
        assert!(!appender.is_open());
        assert!(matches!(
            appender.append(&LogRecord::new(Severity::Info, "lost")),
            Err(LoggerError::WriterClosed { .. })
        ));

        assert_eq!(appender.rotate_if_needed().unwrap(), None);
        assert!(appender.is_open());
        appender
            .append(&LogRecord::new(Severity::Info, "recovered"))
            .unwrap();
        appender.flush().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("recovered"));
        assert!(!content.contains("lost"));
    }

    #[test]
    fn test_failed_rename_keeps_writing_to_original() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("app.txt");
        let mut appender = RotatingFileAppender::open(&config_for(&log_path, 10)).unwrap();
        appender.set_archive_dir(dir.path().join("missing"));

        appender
            .append(&LogRecord::new(Severity::Info, "one"))
            .unwrap();
        assert!(matches!(
            appender.rotate_if_needed(),
            Err(LoggerError::FileRotation { .. })
        ));
        assert!(appender.is_open());

        appender
            .append(&LogRecord::new(Severity::Info, "two"))
            .unwrap();

        // Still oversized, so the next check tries again
        assert!(appender.rotate_if_needed().is_err());
        appender.flush().unwrap();

        let content = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] one"));
        assert!(lines[1].ends_with("[INFO] two"));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_parse_archive_name() {
        let expected = fixed_time().naive_local();

        assert_eq!(
            parse_archive_name("logs_2025-03-01_12-00-00.txt", "logs_", "txt"),
            Some((expected, 0))
        );
        assert_eq!(
            parse_archive_name("logs_2025-03-01_12-00-00_12.txt", "logs_", "txt"),
            Some((expected, 12))
        );
        assert_eq!(parse_archive_name("logs.txt", "logs_", "txt"), None);
        assert_eq!(parse_archive_name("logs_2025-03-01_12-00-00.log", "logs_", "txt"), None);
        assert_eq!(parse_archive_name("logs_2025-03-01_12-00-00_0.txt", "logs_", "txt"), None);
        assert_eq!(parse_archive_name("logs_2025-03-01_12-00-00_x.txt", "logs_", "txt"), None);
    }

    #[test]
    fn test_archived_files_sorted_by_rotation_order() {
        let dir = tempdir().unwrap();
        for name in [
            "logs_2025-03-01_12-00-01.txt",
            "logs_2025-03-01_12-00-00_10.txt",
            "logs_2025-03-01_12-00-00_2.txt",
            "logs_2025-03-01_12-00-00.txt",
            "logs.txt",
            "unrelated.txt",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let names: Vec<String> = archived_files(dir.path(), "logs_", "txt")
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            names,
            vec![
                "logs_2025-03-01_12-00-00.txt",
                "logs_2025-03-01_12-00-00_2.txt",
                "logs_2025-03-01_12-00-00_10.txt",
                "logs_2025-03-01_12-00-01.txt",
            ]
        );
    }
}
