//! Progress reporting for ingestion.

use std::time::Duration;

use tracing::info;

use crate::scan::FileEntry;
use crate::util::format_bytes;

/// Running totals of a hashing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    /// Bytes hashed so far.
    pub bytes: u64,
    /// Bytes the run will hash in total.
    pub total: u64,
    /// Time since hashing started.
    pub elapsed: Duration,
}

impl Throughput {
    /// Completion in percent. An empty run is 100% complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.bytes as f64 / self.total as f64 * 100.0
        }
    }

    /// Average rate in MiB/s.
    pub fn mib_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.bytes as f64 / secs / (1024.0 * 1024.0)
        }
    }
}

/// Receives progress events from the ingestion loop.
///
/// Every method has a no-op default; `()` ignores everything.
pub trait Progress {
    /// Hashing is about to start.
    fn start(&mut self, _total_bytes: u64, _files: usize) {}

    /// `bytes` more bytes were hashed.
    fn advance(&mut self, _bytes: u64) {}

    /// A file was fully hashed.
    fn file_done(&mut self, _entry: &FileEntry, _stats: &Throughput) {}

    /// All files were hashed.
    fn finish(&mut self, _stats: &Throughput) {}
}

impl Progress for () {}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn start(&mut self, total_bytes: u64, files: usize) {
        (**self).start(total_bytes, files);
    }

    fn advance(&mut self, bytes: u64) {
        (**self).advance(bytes);
    }

    fn file_done(&mut self, entry: &FileEntry, stats: &Throughput) {
        (**self).file_done(entry, stats);
    }

    fn finish(&mut self, stats: &Throughput) {
        (**self).finish(stats);
    }
}

/// Logs one line per file and a summary through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn start(&mut self, total_bytes: u64, files: usize) {
        info!("hashing {} in {} files", format_bytes(total_bytes), files);
    }

    fn file_done(&mut self, entry: &FileEntry, stats: &Throughput) {
        info!(
            "{:5.1}% {:7.1} MiB/s   {}",
            stats.percent(),
            stats.mib_per_sec(),
            entry.path
        );
    }

    fn finish(&mut self, stats: &Throughput) {
        info!(
            "completed in {:.2}s (avg {:.2} MiB/s)",
            stats.elapsed.as_secs_f64(),
            stats.mib_per_sec()
        );
    }
}
