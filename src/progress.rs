use crate::model::ScanTask;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

/// Trait for observing scan progress.
///
/// The CLI implements it on top of tracing; tests use it to count events.
/// All methods have default no-op implementations.
pub trait ScanObserver: Send + Sync {
    fn on_scan_start(&self, _tasks: usize, _workers: usize) {}
    fn on_task_start(&self, _worker: usize, _task: &ScanTask) {}
    fn on_task_complete(&self, _worker: usize, _task: &ScanTask, _duration_secs: f64) {}
    fn on_task_failed(&self, _worker: usize, _task: &ScanTask, _error: &str) {}
    fn on_scan_complete(&self, _records: usize, _duration_secs: f64) {}
}

/// No-op observer for silent operation.
pub struct SilentObserver;

impl ScanObserver for SilentObserver {}

/// Reports task progress through `tracing`.
pub struct LogObserver {
    total: AtomicUsize,
    done: AtomicUsize,
}

impl LogObserver {
    pub fn new() -> Self {
        Self {
            total: AtomicUsize::new(0),
            done: AtomicUsize::new(0),
        }
    }

    fn next(&self) -> (usize, usize) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        (done, self.total.load(Ordering::Relaxed))
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanObserver for LogObserver {
    fn on_scan_start(&self, tasks: usize, workers: usize) {
        self.total.store(tasks, Ordering::Relaxed);
        info!("Scanning {} tables on {} workers", tasks, workers);
    }

    fn on_task_complete(&self, worker: usize, task: &ScanTask, duration_secs: f64) {
        let (done, total) = self.next();
        info!(
            "[{}/{}] worker #{} scanned {} ({} columns) in {:.2}s",
            done,
            total,
            worker,
            task.qualified_name(),
            task.columns.len(),
            duration_secs
        );
    }

    fn on_task_failed(&self, worker: usize, task: &ScanTask, error: &str) {
        let (done, total) = self.next();
        warn!(
            "[{}/{}] worker #{} failed on {}: {}",
            done,
            total,
            worker,
            task.qualified_name(),
            error
        );
    }

    fn on_scan_complete(&self, records: usize, duration_secs: f64) {
        info!("Scan complete: {} records in {:.2}s", records, duration_secs);
    }
}
