//! Scan progress reporting.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

/// How many counted files pass between two progress snapshots.
const REPORT_EVERY: u64 = 1000;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files counted so far.
    pub files_scanned: u64,
    /// Number of directories finished so far.
    pub dirs_scanned: u64,
    /// Total bytes counted so far.
    pub bytes_scanned: u64,
    /// Path of the last counted file.
    pub current_path: PathBuf,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Calculate scan rate in files per second.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.files_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Counters shared by every thread of one walk.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    files_scanned: AtomicU64,
    dirs_scanned: AtomicU64,
    bytes_scanned: AtomicU64,
    tx: broadcast::Sender<ScanProgress>,
}

impl ProgressTracker {
    pub fn new(tx: broadcast::Sender<ScanProgress>) -> Self {
        Self {
            start_time: Instant::now(),
            files_scanned: AtomicU64::new(0),
            dirs_scanned: AtomicU64::new(0),
            bytes_scanned: AtomicU64::new(0),
            tx,
        }
    }

    pub fn record_file(&self, size: u64, path: &Path) {
        self.bytes_scanned.fetch_add(size, Ordering::Relaxed);
        let count = self.files_scanned.fetch_add(1, Ordering::Relaxed) + 1;
        if count % REPORT_EVERY == 0 {
            // No subscribers is fine.
            let _ = self.tx.send(self.snapshot(path));
        }
    }

    pub fn record_dir(&self) {
        self.dirs_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, path: &Path) -> ScanProgress {
        ScanProgress {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            dirs_scanned: self.dirs_scanned.load(Ordering::Relaxed),
            bytes_scanned: self.bytes_scanned.load(Ordering::Relaxed),
            current_path: path.to_path_buf(),
            elapsed: self.start_time.elapsed(),
        }
    }
}
