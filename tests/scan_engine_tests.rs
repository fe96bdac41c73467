mod common;

use common::{task, Answer, FakeFactory};
use maxvalue_check::config::ThresholdConfig;
use maxvalue_check::model::Severity;
use maxvalue_check::progress::ScanObserver;
use maxvalue_check::model::ScanTask;
use maxvalue_check::{ScanCoordinator, Status};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn thresholds(warning: f64, critical: f64, ratio: f64) -> ThresholdConfig {
    ThresholdConfig {
        warning_pct: warning,
        critical_pct: critical,
        row_count_max_ratio_pct: ratio,
        show_row_ratio_columns: false,
    }
}

fn tbl_test_factory() -> Arc<FakeFactory> {
    Arc::new(FakeFactory::new(&[(
        "pdbmaxcheck_test.tbl_test.id",
        Answer::Value(Some(1147483647)),
    )]))
}

fn tbl_test() -> Vec<ScanTask> {
    vec![task("pdbmaxcheck_test", "tbl_test", 1000, &[("id", "int(11)")])]
}

#[test]
fn test_scenario_below_thresholds_is_ok() {
    let summary = ScanCoordinator::new(tbl_test_factory())
        .run(tbl_test(), &thresholds(100.0, 100.0, 0.0), 2)
        .unwrap();
    assert_eq!(summary.overall_severity, Severity::Ok);
    assert_eq!(Status::from(summary.overall_severity).exit_code(), 0);
    assert!(summary.critical.is_empty() && summary.warning.is_empty());
}

#[test]
fn test_scenario_warning() {
    let summary = ScanCoordinator::new(tbl_test_factory())
        .run(tbl_test(), &thresholds(25.0, 100.0, 0.0), 2)
        .unwrap();
    assert_eq!(summary.overall_severity, Severity::Warning);
    assert_eq!(Status::from(summary.overall_severity).exit_code(), 1);
    assert_eq!(summary.warning.len(), 1);
    assert_eq!(summary.warning[0].max_value, 1147483647);
    assert!((summary.warning[0].overflow_pct - 53.43).abs() < 0.01);
}

#[test]
fn test_scenario_critical() {
    let summary = ScanCoordinator::new(tbl_test_factory())
        .run(tbl_test(), &thresholds(20.0, 25.0, 0.0), 2)
        .unwrap();
    assert_eq!(summary.overall_severity, Severity::Critical);
    assert_eq!(Status::from(summary.overall_severity).exit_code(), 2);
    assert_eq!(summary.critical.len(), 1);
    assert!(summary.warning.is_empty());
}

#[test]
fn test_failed_task_does_not_affect_others() {
    let factory = Arc::new(FakeFactory::new(&[
        ("db.a.id", Answer::Value(Some(120))),
        ("db.b.id", Answer::Fail("table is marked as crashed".to_string())),
        ("db.c.id", Answer::Value(Some(127))),
    ]));
    let tasks = vec![
        task("db", "c", 127, &[("id", "tinyint(4)")]),
        task("db", "b", 100, &[("id", "tinyint(4)")]),
        task("db", "a", 127, &[("id", "tinyint(4)")]),
    ];

    let summary = ScanCoordinator::new(factory)
        .run(tasks, &thresholds(50.0, 90.0, 0.0), 3)
        .unwrap();

    let tables: Vec<&str> = summary.critical.iter().map(|f| f.table.as_str()).collect();
    assert_eq!(tables, vec!["a", "c"]);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with("db.b: "));
    assert!(summary.errors[0].contains("table is marked as crashed"));
    assert_eq!(summary.overall_severity, Severity::Critical);
}

#[test]
fn test_query_failure_keeps_earlier_columns_of_the_table() {
    let factory = Arc::new(FakeFactory::new(&[
        ("db.t.first", Answer::Value(Some(127))),
        ("db.t.second", Answer::Fail("lost connection".to_string())),
        ("db.t.third", Answer::Value(Some(127))),
    ]));
    let tasks = vec![task(
        "db",
        "t",
        127,
        &[("first", "tinyint(4)"), ("second", "tinyint(4)"), ("third", "tinyint(4)")],
    )];

    let summary = ScanCoordinator::new(factory)
        .run(tasks, &thresholds(50.0, 90.0, 0.0), 1)
        .unwrap();

    assert_eq!(summary.critical.len(), 1);
    assert_eq!(summary.critical[0].column, "first");
    assert_eq!(summary.errors.len(), 1);
}

#[test]
fn test_connection_failure_becomes_error_record() {
    let factory = Arc::new(FakeFactory::refusing());
    let tasks = vec![
        task("db", "a", 1, &[("id", "int(11)")]),
        task("db", "b", 1, &[("id", "int(11)")]),
    ];

    let summary = ScanCoordinator::new(factory.clone())
        .run(tasks, &thresholds(50.0, 90.0, 0.0), 4)
        .unwrap();

    assert_eq!(summary.errors.len(), 2);
    assert_eq!(summary.overall_severity, Severity::Ok);
    assert_eq!(factory.connections.load(Ordering::SeqCst), 2);
}

#[test]
fn test_one_connection_per_task() {
    let factory = Arc::new(FakeFactory::new(&[]));
    let tasks: Vec<_> = (0..10)
        .map(|i| task("db", &format!("t{}", i), 0, &[("id", "int(11)"), ("other", "int(11)")]))
        .collect();

    let summary = ScanCoordinator::new(factory.clone())
        .run(tasks, &ThresholdConfig::default(), 3)
        .unwrap();

    assert_eq!(summary.overall_severity, Severity::Ok);
    assert_eq!(factory.connections.load(Ordering::SeqCst), 10);
}

#[test]
fn test_pool_size_zero_still_scans() {
    let summary = ScanCoordinator::new(tbl_test_factory())
        .run(tbl_test(), &thresholds(20.0, 25.0, 0.0), 0)
        .unwrap();
    assert_eq!(summary.critical.len(), 1);
}

#[test]
fn test_empty_task_list() {
    let summary = ScanCoordinator::new(tbl_test_factory())
        .run(vec![], &ThresholdConfig::default(), 4)
        .unwrap();
    assert_eq!(summary.overall_severity, Severity::Ok);
    assert!(summary.errors.is_empty());
}

#[test]
fn test_result_is_independent_of_pool_size() {
    let answers: Vec<(String, Answer)> = (0..20)
        .map(|i| (format!("db.t{:02}.id", i), Answer::Value(Some(i * 10))))
        .collect();
    let answers: Vec<(&str, Answer)> = answers
        .iter()
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    let tasks: Vec<_> = (0..20)
        .rev()
        .map(|i| task("db", &format!("t{:02}", i), 255, &[("id", "tinyint(3) unsigned")]))
        .collect();
    let cfg = thresholds(30.0, 60.0, 0.0);

    let single = ScanCoordinator::new(Arc::new(FakeFactory::new(&answers)))
        .run(tasks.clone(), &cfg, 1)
        .unwrap();
    let many = ScanCoordinator::new(Arc::new(FakeFactory::new(&answers)))
        .run(tasks, &cfg, 8)
        .unwrap();

    assert_eq!(single, many);
    assert!(!single.critical.is_empty());
    let tables: Vec<&str> = single.critical.iter().map(|f| f.table.as_str()).collect();
    let mut sorted = tables.clone();
    sorted.sort();
    assert_eq!(tables, sorted);
}

#[derive(Default)]
struct CountingObserver {
    started: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl ScanObserver for CountingObserver {
    fn on_task_start(&self, _worker: usize, _task: &ScanTask) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_complete(&self, _worker: usize, _task: &ScanTask, _duration_secs: f64) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_task_failed(&self, _worker: usize, _task: &ScanTask, _error: &str) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_observer_sees_every_task() {
    let factory = Arc::new(FakeFactory::new(&[("db.b.id", Answer::Fail("boom".to_string()))]));
    let observer = Arc::new(CountingObserver::default());
    let tasks = vec![
        task("db", "a", 0, &[("id", "int(11)")]),
        task("db", "b", 0, &[("id", "int(11)")]),
        task("db", "c", 0, &[("id", "int(11)")]),
    ];

    ScanCoordinator::new(factory)
        .with_observer(observer.clone())
        .run(tasks, &ThresholdConfig::default(), 2)
        .unwrap();

    assert_eq!(observer.started.load(Ordering::SeqCst), 3);
    assert_eq!(observer.completed.load(Ordering::SeqCst), 2);
    assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_non_integer_columns_are_skipped_without_error() {
    // Decoding a geometry value as an integer fails, so the column must never be queried.
    let factory = Arc::new(FakeFactory::new(&[
        ("db.places.location", Answer::Fail("cannot decode point".to_string())),
        ("db.places.id", Answer::Value(Some(120))),
    ]));
    let tasks = vec![task(
        "db",
        "places",
        127,
        &[("location", "point"), ("id", "tinyint(4)")],
    )];

    let summary = ScanCoordinator::new(factory)
        .run(tasks, &thresholds(50.0, 90.0, 0.0), 1)
        .unwrap();

    assert!(summary.errors.is_empty());
    assert_eq!(summary.critical.len(), 1);
    assert_eq!(summary.critical[0].column, "id");
}

#[test]
fn test_unsigned_bigint_above_signed_range() {
    let factory = Arc::new(FakeFactory::new(&[(
        "db.events.id",
        Answer::Value(Some(i128::from(u64::MAX - 1))),
    )]));
    let tasks = vec![task("db", "events", 1000, &[("id", "bigint(20) unsigned")])];

    let summary = ScanCoordinator::new(factory)
        .run(tasks, &thresholds(80.0, 95.0, 0.0), 1)
        .unwrap();

    assert_eq!(summary.overall_severity, Severity::Critical);
    assert_eq!(summary.critical[0].max_value, i128::from(u64::MAX - 1));
}

#[derive(Default)]
struct EventLog {
    events: std::sync::Mutex<Vec<&'static str>>,
}

impl EventLog {
    fn record(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }
}

impl ScanObserver for EventLog {
    fn on_scan_start(&self, _tasks: usize, _workers: usize) {
        self.record("scan_start");
    }

    fn on_task_start(&self, _worker: usize, _task: &ScanTask) {
        self.record("task_start");
    }

    fn on_scan_complete(&self, _records: usize, _duration_secs: f64) {
        self.record("scan_complete");
    }
}

#[test]
fn test_scan_start_is_reported_before_any_task() {
    let observer = Arc::new(EventLog::default());
    let tasks: Vec<_> = (0..16)
        .map(|i| task("db", &format!("t{}", i), 0, &[("id", "int(11)")]))
        .collect();

    ScanCoordinator::new(Arc::new(FakeFactory::new(&[])))
        .with_observer(observer.clone())
        .run(tasks, &ThresholdConfig::default(), 4)
        .unwrap();

    let events = observer.events.lock().unwrap();
    assert_eq!(events.first(), Some(&"scan_start"));
    assert_eq!(events.last(), Some(&"scan_complete"));
    assert_eq!(events.iter().filter(|e| **e == "task_start").count(), 16);
}
