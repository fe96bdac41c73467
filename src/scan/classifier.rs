use crate::config::ThresholdConfig;
use crate::model::{ClassifiedRecord, ColumnFinding, ColumnSpec};
use crate::scan::capacity::{capacity_of, parse_declared_type};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Investigate,
    Warning,
    Critical,
}

/// Outcome of classifying one column, with the ratios it was judged on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub verdict: Verdict,
    pub max_value: i128,
    pub overflow_pct: f64,
    pub row_count_ratio: f64,
}

impl Classification {
    /// Converts a non-ok classification into the record a worker publishes.
    pub fn into_record(self, col: &ColumnSpec) -> Option<ClassifiedRecord> {
        let finding = ColumnFinding {
            schema: col.schema.clone(),
            table: col.table.clone(),
            column: col.name.clone(),
            declared_type: col.declared_type.clone(),
            max_value: self.max_value,
            overflow_pct: self.overflow_pct,
            row_count_ratio: self.row_count_ratio,
        };
        match self.verdict {
            Verdict::Ok => None,
            Verdict::Investigate => Some(ClassifiedRecord::Investigate(finding)),
            Verdict::Warning => Some(ClassifiedRecord::Warning(finding)),
            Verdict::Critical => Some(ClassifiedRecord::Critical(finding)),
        }
    }
}

/// Classifies a column from its observed maximum and its table's row count.
///
/// A `None` maximum (empty table) counts as zero. Columns whose declared type
/// has no known capacity are never flagged. Above the critical threshold a
/// column is critical when the table is large enough relative to the type,
/// otherwise it is only reported for investigation when
/// `show_row_ratio_columns` is set; the warning threshold behaves the same
/// way one tier lower.
pub fn classify(
    observed_max: Option<i128>,
    row_count: i64,
    col: &ColumnSpec,
    cfg: &ThresholdConfig,
) -> Classification {
    let max_value = observed_max.unwrap_or(0);
    let (base_type, unsigned) = parse_declared_type(&col.declared_type);

    let capacity = match capacity_of(base_type, unsigned) {
        Ok(capacity) => capacity,
        Err(e) => {
            debug!(
                "Skipping {}.{}.{}: {}",
                col.schema, col.table, col.name, e
            );
            return Classification {
                verdict: Verdict::Ok,
                max_value,
                overflow_pct: 0.0,
                row_count_ratio: 0.0,
            };
        }
    };

    let overflow_pct = (max_value as f64 / capacity) * 100.0;
    let row_count_ratio = (row_count as f64 / capacity) * 100.0;

    trace!(
        "{}.{}.{}: overflow_pct={}, row_count_ratio={}",
        col.schema,
        col.table,
        col.name,
        overflow_pct,
        row_count_ratio
    );

    let verdict = if overflow_pct > cfg.critical_pct {
        if row_count_ratio >= cfg.row_count_max_ratio_pct {
            Verdict::Critical
        } else if cfg.show_row_ratio_columns {
            Verdict::Investigate
        } else {
            Verdict::Ok
        }
    } else if overflow_pct > cfg.warning_pct {
        if row_count_ratio >= cfg.row_count_max_ratio_pct {
            Verdict::Warning
        } else if cfg.show_row_ratio_columns {
            Verdict::Investigate
        } else {
            Verdict::Ok
        }
    } else {
        Verdict::Ok
    };

    Classification {
        verdict,
        max_value,
        overflow_pct,
        row_count_ratio,
    }
}
