use std::cmp::Ordering;

/// An integer column discovered by the schema enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub schema: String,
    pub table: String,
    pub name: String,
    /// Raw MySQL `COLUMN_TYPE`, e.g. `int(10) unsigned`.
    pub declared_type: String,
}

/// One table to scan: every candidate column plus the table's row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub schema: String,
    pub table: String,
    pub row_count: i64,
    pub columns: Vec<ColumnSpec>,
}

impl ScanTask {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

/// Measurements taken for a single column that crossed a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFinding {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub declared_type: String,
    pub max_value: i128,
    pub overflow_pct: f64,
    pub row_count_ratio: f64,
}

impl ColumnFinding {
    /// Canonical report order: schema, then table, then column.
    pub fn cmp_identity(&self, other: &Self) -> Ordering {
        (&self.schema, &self.table, &self.column).cmp(&(&other.schema, &other.table, &other.column))
    }
}

pub fn sort_findings(findings: &mut [ColumnFinding]) {
    findings.sort_by(|a, b| a.cmp_identity(b));
}

/// A tagged result pushed by a scan worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedRecord {
    Critical(ColumnFinding),
    Warning(ColumnFinding),
    Investigate(ColumnFinding),
    Error { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
}

/// Partitioned, sorted outcome of one scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub critical: Vec<ColumnFinding>,
    pub warning: Vec<ColumnFinding>,
    pub investigate: Vec<ColumnFinding>,
    pub errors: Vec<String>,
    pub overall_severity: Severity,
}

impl ScanSummary {
    /// Columns to alert on: critical then warning when critical, warning alone
    /// when warning, nothing when ok.
    pub fn alert_columns(&self) -> Vec<&ColumnFinding> {
        match self.overall_severity {
            Severity::Critical => self.critical.iter().chain(self.warning.iter()).collect(),
            Severity::Warning => self.warning.iter().collect(),
            Severity::Ok => Vec::new(),
        }
    }
}
