//! Plugin status line, exit codes and persistence of flagged columns.

use crate::config::ThresholdConfig;
use crate::db::{Reason, ResultRow, ResultsStore};
use crate::model::{ColumnFinding, ScanSummary, Severity};
use chrono::NaiveDateTime;
use std::fmt;
use tracing::{debug, error};

/// Monitoring plugin status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    /// The check could not run to completion.
    Unknown,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARN",
            Status::Critical => "CRIT",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl From<Severity> for Status {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Ok => Status::Ok,
            Severity::Warning => Status::Warning,
            Severity::Critical => Status::Critical,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `schema.table\tcolumn\ttype\tmax\tpct%`
pub fn format_column(finding: &ColumnFinding) -> String {
    format!(
        "{}.{}\t{}\t{}\t{}\t{:.2}%",
        finding.schema,
        finding.table,
        finding.column,
        finding.declared_type,
        finding.max_value,
        finding.overflow_pct
    )
}

/// Full plugin output: the status line, the alerting columns and, when
/// present, the investigate section.
pub fn render(summary: &ScanSummary, thresholds: &ThresholdConfig) -> String {
    let status = Status::from(summary.overall_severity);
    let mut msg = String::new();

    let columns = summary.alert_columns();
    if !columns.is_empty() {
        msg.push('\n');
        msg.push_str(
            &columns
                .iter()
                .map(|f| format_column(f))
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }

    if !summary.investigate.is_empty() {
        if !msg.is_empty() {
            msg.push('\n');
        }
        msg.push_str(&format!(
            "\nColumns containing high values compared to maximum for the column datatype, \
             but number of rows is less than {}% of maximum for the column type:\n",
            thresholds.row_count_max_ratio_pct
        ));
        msg.push_str(
            &summary
                .investigate
                .iter()
                .map(format_column)
                .collect::<Vec<_>>()
                .join("\n"),
        );
    }

    format!("{}:{}", status, msg)
}

/// Output for a run that never reached the scan.
pub fn render_unknown(error: &dyn fmt::Display) -> String {
    format!("{}: ERROR: {}", Status::Unknown, error)
}

/// Rows to store for a finished scan: critical and warning columns when the
/// check alerts, investigate columns whenever there are any.
pub fn result_rows(
    summary: &ScanSummary,
    hostname: &str,
    timestamp: NaiveDateTime,
) -> Vec<ResultRow> {
    let mut rows = Vec::new();
    if summary.overall_severity != Severity::Ok {
        for finding in &summary.critical {
            rows.push(ResultRow::from_finding(hostname, finding, Reason::Critical, timestamp));
        }
        for finding in &summary.warning {
            rows.push(ResultRow::from_finding(hostname, finding, Reason::Warning, timestamp));
        }
    }
    for finding in &summary.investigate {
        rows.push(ResultRow::from_finding(hostname, finding, Reason::Investigate, timestamp));
    }
    rows
}

/// Stores the summary's rows. Failures are logged and counted; they never
/// change the check status.
pub fn persist_summary(
    store: &mut dyn ResultsStore,
    summary: &ScanSummary,
    hostname: &str,
    timestamp: NaiveDateTime,
) -> usize {
    let rows = result_rows(summary, hostname, timestamp);
    let mut failed = 0;
    for row in &rows {
        if let Err(e) = store.insert(row) {
            failed += 1;
            error!(
                "Failed to store {} column {}.{}.{}: {}",
                row.reason, row.schema, row.table, row.column, e
            );
        }
    }
    debug!("Stored {} of {} result rows", rows.len() - failed, rows.len());
    failed
}
