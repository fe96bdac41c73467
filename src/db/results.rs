use super::mysql::establish_connection;
use super::schema;
use super::ResultsStore;
use crate::config::ResultsConfig;
use crate::error::Result;
use crate::model::ColumnFinding;
use chrono::NaiveDateTime;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use std::fmt;

/// Why a column was stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Critical,
    Warning,
    Investigate,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::Critical => "critical",
            Reason::Warning => "warning",
            Reason::Investigate => "investigate",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of `int_overflow_check_results`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub hostname: String,
    pub schema: String,
    pub table: String,
    pub column: String,
    pub max_value: i128,
    pub overflow_pct: f64,
    pub reason: Reason,
    pub timestamp: NaiveDateTime,
}

impl ResultRow {
    pub fn from_finding(
        hostname: &str,
        finding: &ColumnFinding,
        reason: Reason,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            hostname: hostname.to_string(),
            schema: finding.schema.clone(),
            table: finding.table.clone(),
            column: finding.column.clone(),
            max_value: finding.max_value,
            overflow_pct: finding.overflow_pct,
            reason,
            timestamp,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = schema::int_overflow_check_results)]
struct NewResultRow<'a> {
    hostname: &'a str,
    dbname: &'a str,
    table_name: &'a str,
    column_name: &'a str,
    max_size: u64,
    percentage: f64,
    reason: &'a str,
    timestamp: NaiveDateTime,
}

impl<'a> From<&'a ResultRow> for NewResultRow<'a> {
    fn from(row: &'a ResultRow) -> Self {
        Self {
            hostname: &row.hostname,
            dbname: &row.schema,
            table_name: &row.table,
            column_name: &row.column,
            // Flagged columns never hold a negative maximum.
            max_size: u64::try_from(row.max_value.max(0)).unwrap_or(u64::MAX),
            percentage: row.overflow_pct,
            reason: row.reason.as_str(),
            timestamp: row.timestamp,
        }
    }
}

/// Writes flagged columns to the reporting database.
pub struct MysqlResultsStore {
    connection: MysqlConnection,
}

impl MysqlResultsStore {
    pub fn connect(config: &ResultsConfig) -> Result<Self> {
        let connection = establish_connection(&config.connection().database_url()?)?;
        Ok(Self { connection })
    }
}

impl ResultsStore for MysqlResultsStore {
    fn insert(&mut self, row: &ResultRow) -> Result<()> {
        diesel::insert_into(schema::int_overflow_check_results::table)
            .values(NewResultRow::from(row))
            .execute(&mut self.connection)?;
        Ok(())
    }
}
