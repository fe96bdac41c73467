//! Database collaborators of the scan engine.
//!
//! The engine only talks to the traits declared here; `mysql`, `enumerate`
//! and `results` provide the diesel-backed implementations.

pub mod enumerate;
pub mod mysql;
pub mod results;
pub mod schema;

use crate::config::EnumerationFilter;
use crate::error::Result;
use crate::model::ScanTask;

pub use enumerate::{build_scan_tasks, ColumnRow, MysqlSchemaEnumerator};
pub use mysql::{MysqlConnectionFactory, MysqlScalarQuery};
pub use results::{MysqlResultsStore, Reason, ResultRow};

/// An open connection able to run a single-value query.
pub trait ScalarQuery {
    /// Runs `sql` and returns the first column of the first row, `None`
    /// for SQL NULL or an empty result. `unsigned` selects how the integer
    /// is decoded, so `bigint unsigned` values above `i64::MAX` survive.
    fn query_scalar(&mut self, sql: &str, unsigned: bool) -> Result<Option<i128>>;
}

/// Opens connections for scan workers. Each call yields a connection owned
/// by the caller and closed when dropped.
pub trait ConnectionFactory: Send + Sync {
    fn connect(&self) -> Result<Box<dyn ScalarQuery>>;
}

/// Produces the per-table scan tasks for a run.
pub trait SchemaEnumerator {
    fn enumerate(&self, filter: &EnumerationFilter) -> Result<Vec<ScanTask>>;
}

/// Destination for flagged columns.
pub trait ResultsStore {
    fn insert(&mut self, row: &ResultRow) -> Result<()>;
}
