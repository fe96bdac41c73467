//! Concurrent scan-and-classify engine.

pub mod capacity;
pub mod classifier;
pub mod coordinator;
pub mod pool;
pub mod queue;
pub mod worker;

pub use classifier::{classify, Classification, Verdict};
pub use coordinator::{summarize, ScanCoordinator};
pub use pool::{PoolHandle, WorkerPool};
pub use queue::{result_sink, Next, ResultCollector, ResultSink, TaskQueue};
pub use worker::{max_query, ScanWorker, WorkerStats};
