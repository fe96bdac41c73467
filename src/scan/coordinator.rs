use crate::config::ThresholdConfig;
use crate::db::ConnectionFactory;
use crate::error::Result;
use crate::model::{sort_findings, ClassifiedRecord, ScanSummary, ScanTask, Severity};
use crate::progress::{ScanObserver, SilentObserver};
use crate::scan::pool::WorkerPool;
use crate::scan::queue::{result_sink, TaskQueue};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Entry point of the scan engine: queue, pool, join, drain, reduce.
pub struct ScanCoordinator {
    factory: Arc<dyn ConnectionFactory>,
    observer: Arc<dyn ScanObserver>,
}

impl ScanCoordinator {
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            factory,
            observer: Arc::new(SilentObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn run(
        &self,
        tasks: Vec<ScanTask>,
        thresholds: &ThresholdConfig,
        pool_size: usize,
    ) -> Result<ScanSummary> {
        let start = Instant::now();
        let task_count = tasks.len();
        let queue = TaskQueue::sealed(tasks);
        let (sink, collector) = result_sink();

        let workers = pool_size.max(1);
        debug!("Scanning {} tables with {} workers", task_count, workers);
        self.observer.on_scan_start(task_count, workers);

        let pool = WorkerPool::start(
            pool_size,
            &queue,
            &sink,
            Arc::clone(&self.factory),
            thresholds,
            Arc::clone(&self.observer),
        )?;
        // Release our producer handle so only the workers hold one.
        drop(queue);
        drop(sink);

        let stats = pool.join();
        debug!("Worker stats: {:?}", stats);

        let records = collector.drain_all();
        self.observer
            .on_scan_complete(records.len(), start.elapsed().as_secs_f64());

        Ok(summarize(records))
    }
}

/// Partitions records by tag, sorts each bucket and derives the severity.
///
/// Error records never raise the severity on their own.
pub fn summarize(records: Vec<ClassifiedRecord>) -> ScanSummary {
    let mut critical = Vec::new();
    let mut warning = Vec::new();
    let mut investigate = Vec::new();
    let mut errors = Vec::new();

    for record in records {
        match record {
            ClassifiedRecord::Critical(f) => critical.push(f),
            ClassifiedRecord::Warning(f) => warning.push(f),
            ClassifiedRecord::Investigate(f) => investigate.push(f),
            ClassifiedRecord::Error { message } => errors.push(message),
        }
    }

    sort_findings(&mut critical);
    sort_findings(&mut warning);
    sort_findings(&mut investigate);
    errors.sort();

    let overall_severity = if !critical.is_empty() {
        Severity::Critical
    } else if !warning.is_empty() {
        Severity::Warning
    } else {
        Severity::Ok
    };

    ScanSummary {
        critical,
        warning,
        investigate,
        errors,
        overall_severity,
    }
}
