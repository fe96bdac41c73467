use super::mysql::establish_connection;
use super::SchemaEnumerator;
use crate::config::EnumerationFilter;
use crate::error::{Error, Result};
use crate::model::{ColumnSpec, ScanTask};
use diesel::mysql::Mysql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

const COLUMNS_QUERY: &str = "
    SELECT
        c.TABLE_SCHEMA AS table_schema,
        c.TABLE_NAME AS table_name,
        c.COLUMN_NAME AS column_name,
        CAST(c.COLUMN_TYPE AS CHAR) AS column_type,
        CAST(t.TABLE_ROWS AS SIGNED) AS table_rows,
        CAST(c.COLUMN_KEY AS CHAR) AS column_key,
        CAST(s.SEQ_IN_INDEX AS SIGNED) AS seq_in_index
    FROM INFORMATION_SCHEMA.COLUMNS c
    LEFT JOIN INFORMATION_SCHEMA.TABLES t
    ON c.TABLE_SCHEMA = t.TABLE_SCHEMA AND c.TABLE_NAME = t.TABLE_NAME
    LEFT JOIN INFORMATION_SCHEMA.STATISTICS s
    ON c.TABLE_SCHEMA = s.TABLE_SCHEMA AND c.TABLE_NAME = s.TABLE_NAME
        AND c.COLUMN_NAME = s.COLUMN_NAME
    WHERE c.COLUMN_TYPE LIKE '%int%'";

/// One row of the INFORMATION_SCHEMA column listing. A column that belongs
/// to several indexes appears once per index.
#[derive(Debug, Clone, PartialEq, Eq, QueryableByName)]
pub struct ColumnRow {
    #[diesel(sql_type = Text)]
    pub table_schema: String,
    #[diesel(sql_type = Text)]
    pub table_name: String,
    #[diesel(sql_type = Text)]
    pub column_name: String,
    #[diesel(sql_type = Text)]
    pub column_type: String,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub table_rows: Option<i64>,
    #[diesel(sql_type = Nullable<Text>)]
    pub column_key: Option<String>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub seq_in_index: Option<i64>,
}

/// Groups candidate columns into one task per table.
///
/// Primary key columns are always scanned, the leading column of any other
/// index only with `secondary_keys`, and every column with
/// `scan_all_columns`. Excluded columns are dropped and no column is
/// scheduled twice. Tables and columns keep the order of `rows`.
pub fn build_scan_tasks(rows: &[ColumnRow], filter: &EnumerationFilter) -> Vec<ScanTask> {
    let mut tasks: Vec<ScanTask> = Vec::new();
    let mut task_index: HashMap<(String, String), usize> = HashMap::new();
    let mut added: HashSet<(String, String, String)> = HashSet::new();

    for row in rows {
        let schema = &row.table_schema;
        let table = &row.table_name;
        let column = &row.column_name;

        if filter.is_excluded(schema, table, column) {
            debug!("Excluded column: {}.{}.{}", schema, table, column);
            continue;
        }

        let column_key = row
            .column_key
            .as_deref()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty());
        let is_primary = column_key.as_deref() == Some("pri");
        let is_leading_secondary =
            column_key.is_some() && !is_primary && row.seq_in_index == Some(1);

        let include = is_primary
            || (filter.secondary_keys && is_leading_secondary)
            || filter.scan_all_columns;
        if !include {
            continue;
        }

        if !added.insert((schema.clone(), table.clone(), column.clone())) {
            continue;
        }

        let spec = ColumnSpec {
            schema: schema.clone(),
            table: table.clone(),
            name: column.clone(),
            declared_type: row.column_type.clone(),
        };

        match task_index.get(&(schema.clone(), table.clone())) {
            Some(&i) => tasks[i].columns.push(spec),
            None => {
                task_index.insert((schema.clone(), table.clone()), tasks.len());
                tasks.push(ScanTask {
                    schema: schema.clone(),
                    table: table.clone(),
                    row_count: row.table_rows.unwrap_or(0),
                    columns: vec![spec],
                });
            }
        }
    }

    tasks
}

/// Lists integer columns from INFORMATION_SCHEMA over a short-lived connection.
pub struct MysqlSchemaEnumerator {
    database_url: String,
}

impl MysqlSchemaEnumerator {
    pub fn new(database_url: String) -> Self {
        Self { database_url }
    }

    fn load_rows(&self, filter: &EnumerationFilter) -> Result<Vec<ColumnRow>> {
        let mut sql = String::from(COLUMNS_QUERY);
        if !filter.use_dbs.is_empty() {
            sql.push_str(&format!(
                " AND c.TABLE_SCHEMA IN ({})",
                placeholders(filter.use_dbs.len())
            ));
        }
        if !filter.ignore_dbs.is_empty() {
            sql.push_str(&format!(
                " AND c.TABLE_SCHEMA NOT IN ({})",
                placeholders(filter.ignore_dbs.len())
            ));
        }
        sql.push_str(" ORDER BY c.TABLE_SCHEMA, c.TABLE_NAME, c.ORDINAL_POSITION");
        debug!("{}", sql);

        let mut query = diesel::sql_query(sql).into_boxed::<Mysql>();
        for db in filter.use_dbs.iter().chain(filter.ignore_dbs.iter()) {
            query = query.bind::<Text, _>(db.clone());
        }

        let mut connection = establish_connection(&self.database_url)?;
        let rows = query.load::<ColumnRow>(&mut connection)?;
        debug!("{} column rows", rows.len());
        Ok(rows)
    }
}

impl SchemaEnumerator for MysqlSchemaEnumerator {
    fn enumerate(&self, filter: &EnumerationFilter) -> Result<Vec<ScanTask>> {
        let rows = self
            .load_rows(filter)
            .map_err(|e| Error::Enumeration(e.to_string()))?;
        let tasks = build_scan_tasks(&rows, filter);
        info!(
            "{} tables, {} columns to scan",
            tasks.len(),
            tasks.iter().map(|t| t.columns.len()).sum::<usize>()
        );
        Ok(tasks)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
