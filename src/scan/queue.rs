//! Shared task queue and result sink used by the scan workers.

use crate::model::{ClassifiedRecord, ScanTask};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

/// Result of a non-blocking pop.
#[derive(Debug)]
pub enum Next {
    Task(ScanTask),
    Empty,
}

/// Multi-consumer queue of scan tasks, fully loaded before any worker starts.
///
/// The producing side is dropped as soon as the queue is sealed, so an empty
/// queue means there is no more work.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    rx: Receiver<ScanTask>,
}

impl TaskQueue {
    pub fn sealed<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = ScanTask>,
    {
        let (tx, rx) = unbounded();
        for task in tasks {
            // rx is alive for the whole loop, so an unbounded send cannot fail
            let _ = tx.send(task);
        }
        Self { rx }
    }

    /// Removes one task. Each task is handed to exactly one caller.
    pub fn pop(&self) -> Next {
        match self.rx.try_recv() {
            Ok(task) => Next::Task(task),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => Next::Empty,
        }
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Creates a connected sink / collector pair.
pub fn result_sink() -> (ResultSink, ResultCollector) {
    let (tx, rx) = unbounded();
    (ResultSink { tx }, ResultCollector { rx })
}

/// Producer handle cloned into every worker.
#[derive(Debug, Clone)]
pub struct ResultSink {
    tx: Sender<ClassifiedRecord>,
}

impl ResultSink {
    pub fn push(&self, record: ClassifiedRecord) {
        // The collector outlives every worker, so the channel is never closed here.
        let _ = self.tx.send(record);
    }
}

/// Consumer side, owned by the coordinator and drained once after the pool joins.
#[derive(Debug)]
pub struct ResultCollector {
    rx: Receiver<ClassifiedRecord>,
}

impl ResultCollector {
    /// Takes every buffered record, in no particular order.
    pub fn drain_all(self) -> Vec<ClassifiedRecord> {
        self.rx.try_iter().collect()
    }
}
