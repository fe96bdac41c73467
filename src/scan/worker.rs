use crate::config::ThresholdConfig;
use crate::db::ConnectionFactory;
use crate::error::Result;
use crate::model::{ClassifiedRecord, ScanTask};
use crate::progress::ScanObserver;
use crate::scan::capacity::{parse_declared_type, IntType};
use crate::scan::classifier::classify;
use crate::scan::queue::{Next, ResultSink, TaskQueue};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Per-worker counters returned when the worker exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub tasks_scanned: usize,
    pub tasks_failed: usize,
    pub columns_scanned: usize,
}

/// Drains the task queue, one `MAX()` query per column.
pub struct ScanWorker {
    id: usize,
    queue: TaskQueue,
    sink: ResultSink,
    factory: Arc<dyn ConnectionFactory>,
    thresholds: ThresholdConfig,
    observer: Arc<dyn ScanObserver>,
}

impl ScanWorker {
    pub fn new(
        id: usize,
        queue: TaskQueue,
        sink: ResultSink,
        factory: Arc<dyn ConnectionFactory>,
        thresholds: ThresholdConfig,
        observer: Arc<dyn ScanObserver>,
    ) -> Self {
        Self {
            id,
            queue,
            sink,
            factory,
            thresholds,
            observer,
        }
    }

    /// Runs until the queue is empty. A failing task becomes an `Error`
    /// record and the worker moves on to the next task.
    pub fn run(self) -> WorkerStats {
        debug!("Worker #{} started", self.id);
        let mut stats = WorkerStats::default();

        while let Next::Task(task) = self.queue.pop() {
            debug!("Worker #{} processing '{}'", self.id, task.qualified_name());
            self.observer.on_task_start(self.id, &task);
            let start = Instant::now();

            match self.scan_task(&task, &mut stats) {
                Ok(()) => {
                    stats.tasks_scanned += 1;
                    self.observer
                        .on_task_complete(self.id, &task, start.elapsed().as_secs_f64());
                }
                Err(e) => {
                    stats.tasks_failed += 1;
                    let message = format!("{}: {}", task.qualified_name(), e);
                    error!("Worker #{} failed on {}", self.id, message);
                    self.observer.on_task_failed(self.id, &task, &message);
                    self.sink.push(ClassifiedRecord::Error { message });
                }
            }
        }

        debug!("Worker #{} ended: {:?}", self.id, stats);
        stats
    }

    fn scan_task(&self, task: &ScanTask, stats: &mut WorkerStats) -> Result<()> {
        let mut conn = self.factory.connect()?;

        for col in &task.columns {
            // `LIKE '%int%'` also matches types such as `point`.
            let (base_type, unsigned) = parse_declared_type(&col.declared_type);
            if let Err(e) = IntType::parse(base_type) {
                debug!(
                    "Worker #{} skipping {}.{}: {}",
                    self.id,
                    task.qualified_name(),
                    col.name,
                    e
                );
                continue;
            }

            let sql = max_query(&task.schema, &task.table, &col.name);
            debug!("Worker #{} query: {}", self.id, sql);

            let max_value = conn.query_scalar(&sql, unsigned)?;
            debug!("Worker #{} max_value: {:?}", self.id, max_value);
            stats.columns_scanned += 1;

            let classification = classify(max_value, task.row_count, col, &self.thresholds);
            if let Some(record) = classification.into_record(col) {
                debug!("Worker #{} flagged: {:?}", self.id, record);
                self.sink.push(record);
            }
        }

        Ok(())
    }
}

/// Builds `SELECT MAX(`column`) FROM `schema`.`table``.
pub fn max_query(schema: &str, table: &str, column: &str) -> String {
    format!(
        "SELECT MAX({}) FROM {}.{}",
        quote_ident(column),
        quote_ident(schema),
        quote_ident(table)
    )
}

fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
