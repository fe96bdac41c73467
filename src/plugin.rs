use crate::config::AppConfig;
use crate::db::{ConnectionFactory, ResultsStore, SchemaEnumerator};
use crate::model::ScanSummary;
use crate::progress::ScanObserver;
use crate::report::{self, Status};
use crate::scan::ScanCoordinator;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// What the check prints and how it exits.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub status: Status,
    pub output: String,
    /// `None` when the run failed before scanning.
    pub summary: Option<ScanSummary>,
}

impl CheckOutcome {
    fn unknown(error: &dyn std::fmt::Display) -> Self {
        Self {
            status: Status::Unknown,
            output: report::render_unknown(error),
            summary: None,
        }
    }
}

/// Runs one complete check: enumerate, scan, render, persist.
pub fn run_check(
    config: &AppConfig,
    enumerator: &dyn SchemaEnumerator,
    factory: Arc<dyn ConnectionFactory>,
    store: Option<&mut dyn ResultsStore>,
    observer: Arc<dyn ScanObserver>,
) -> CheckOutcome {
    let start = Instant::now();
    info!("Check started with options: {:?}", config.filter);

    let tasks = match enumerator.enumerate(&config.filter) {
        Ok(tasks) => tasks,
        Err(e) => {
            error!("{}", e);
            return CheckOutcome::unknown(&e);
        }
    };

    let coordinator = ScanCoordinator::new(factory).with_observer(observer);
    let summary = match coordinator.run(tasks, &config.thresholds, config.threads) {
        Ok(summary) => summary,
        Err(e) => {
            error!("{}", e);
            return CheckOutcome::unknown(&e);
        }
    };

    for message in &summary.errors {
        warn!("Scan error: {}", message);
    }

    let status = Status::from(summary.overall_severity);
    let output = report::render(&summary, &config.thresholds);

    if let Some(store) = store {
        let hostname = config.connection.host.as_deref().unwrap_or("");
        let timestamp = chrono::Local::now().naive_local();
        let failed = report::persist_summary(store, &summary, hostname, timestamp);
        if failed > 0 {
            warn!("{} result rows could not be stored", failed);
        }
    }

    info!(
        "Check finished in {:.2}s with status {}",
        start.elapsed().as_secs_f64(),
        status
    );

    CheckOutcome {
        status,
        output,
        summary: Some(summary),
    }
}
