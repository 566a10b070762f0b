//! Logger metrics for observability
//!
//! Counters are shared between producers and the background worker. None of
//! them is ever surfaced to callers as an error; they exist so that silent
//! drops and worker-side failures can still be observed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what the logger did with submitted records
///
/// # Example
///
/// ```
/// use rotalog::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.written(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records written to the file sink
    written: AtomicU64,

    /// Records dropped because they were below the minimum severity
    filtered: AtomicU64,

    /// Records submitted after shutdown began
    rejected_after_shutdown: AtomicU64,

    /// Records the file sink failed to write
    write_failures: AtomicU64,

    /// Successful rotations
    rotations: AtomicU64,

    /// Rotations that could not archive or reopen the file
    rotation_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            written: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            rejected_after_shutdown: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            rotation_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_after_shutdown(&self) -> u64 {
        self.rejected_after_shutdown.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotation_failures(&self) -> u64 {
        self.rotation_failures.load(Ordering::Relaxed)
    }

    /// Record a written entry, returning the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected_after_shutdown(&self) -> u64 {
        self.rejected_after_shutdown.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation_failure(&self) -> u64 {
        self.rotation_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of accepted records that failed to reach the file (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been processed yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.written.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.rejected_after_shutdown.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.rotations.store(0, Ordering::Relaxed);
        self.rotation_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            written: AtomicU64::new(self.written()),
            filtered: AtomicU64::new(self.filtered()),
            rejected_after_shutdown: AtomicU64::new(self.rejected_after_shutdown()),
            write_failures: AtomicU64::new(self.write_failures()),
            rotations: AtomicU64::new(self.rotations()),
            rotation_failures: AtomicU64::new(self.rotation_failures()),
        }
    }
}
