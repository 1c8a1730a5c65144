//! Scan progress shared by the worker pool.
//!
//! Workers bump these counters as each job finishes; the scheduler hands out
//! snapshots so callers can watch a long run or check how many windows were
//! counted in total.

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress snapshot of a fragment-counting run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Number of `(k, offset)` jobs whose table has been published.
    pub jobs_completed: u64,
    /// Number of windows counted across all completed jobs.
    pub windows_scanned: u64,
}

/// Thread-safe progress tracker using atomic counters.
#[derive(Debug, Default)]
pub struct ScanProgress {
    jobs: AtomicU64,
    windows: AtomicU64,
}

impl ScanProgress {
    /// Create a new progress tracker with zero counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            jobs: AtomicU64::new(0),
            windows: AtomicU64::new(0),
        }
    }

    /// Record that a job finished after counting `windows` windows.
    pub fn record_job(&self, windows: u64) {
        self.windows.fetch_add(windows, Ordering::Relaxed);
        self.jobs.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the current progress.
    ///
    /// The values may change immediately after this call returns while
    /// workers are still running.
    pub fn snapshot(&self) -> Progress {
        Progress {
            jobs_completed: self.jobs.load(Ordering::Relaxed),
            windows_scanned: self.windows.load(Ordering::Relaxed),
        }
    }
}
