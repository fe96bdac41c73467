use crate::config::ThresholdConfig;
use crate::db::ConnectionFactory;
use crate::error::Result;
use crate::model::ClassifiedRecord;
use crate::progress::ScanObserver;
use crate::scan::queue::{ResultSink, TaskQueue};
use crate::scan::worker::{ScanWorker, WorkerStats};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error};

/// Fixed-size set of scan worker threads sharing one queue and one sink.
pub struct WorkerPool;

/// Running pool. Dropping it without calling [`PoolHandle::join`] detaches
/// the workers.
pub struct PoolHandle {
    handles: Vec<JoinHandle<WorkerStats>>,
    sink: ResultSink,
}

impl WorkerPool {
    /// Spawns `n` workers; `n == 0` still spawns one.
    pub fn start(
        n: usize,
        queue: &TaskQueue,
        sink: &ResultSink,
        factory: Arc<dyn ConnectionFactory>,
        thresholds: &ThresholdConfig,
        observer: Arc<dyn ScanObserver>,
    ) -> Result<PoolHandle> {
        Self::start_with(n, queue, sink, factory, thresholds, observer, |id, worker| {
            thread::Builder::new()
                .name(format!("scan-worker-{}", id))
                .spawn(move || worker.run())
        })
    }

    /// Like [`WorkerPool::start`] with a custom thread spawner. If a spawn
    /// fails, the workers already running are joined before the error is
    /// returned.
    fn start_with<S>(
        n: usize,
        queue: &TaskQueue,
        sink: &ResultSink,
        factory: Arc<dyn ConnectionFactory>,
        thresholds: &ThresholdConfig,
        observer: Arc<dyn ScanObserver>,
        mut spawn: S,
    ) -> Result<PoolHandle>
    where
        S: FnMut(usize, ScanWorker) -> io::Result<JoinHandle<WorkerStats>>,
    {
        let n = n.max(1);
        let mut handles = Vec::with_capacity(n);

        for id in 0..n {
            let worker = ScanWorker::new(
                id,
                queue.clone(),
                sink.clone(),
                Arc::clone(&factory),
                *thresholds,
                Arc::clone(&observer),
            );
            match spawn(id, worker) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    error!("Failed to start scan worker #{}: {}", id, e);
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(e.into());
                }
            }
        }
        debug!("Started {} scan workers", n);

        Ok(PoolHandle {
            handles,
            sink: sink.clone(),
        })
    }
}

impl PoolHandle {
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Blocks until every worker has exited and returns their counters.
    ///
    /// A worker that panicked contributes an `Error` record instead of stats.
    pub fn join(self) -> Vec<WorkerStats> {
        let mut stats = Vec::with_capacity(self.handles.len());
        for (id, handle) in self.handles.into_iter().enumerate() {
            match handle.join() {
                Ok(s) => stats.push(s),
                Err(_) => {
                    let message = format!("scan worker #{} panicked", id);
                    error!("{}", message);
                    self.sink.push(ClassifiedRecord::Error { message });
                }
            }
        }
        debug!("All scan workers finished");
        stats
    }
}
