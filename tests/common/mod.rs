#![allow(dead_code)]

use maxvalue_check::config::EnumerationFilter;
use maxvalue_check::db::{ConnectionFactory, ResultRow, ResultsStore, ScalarQuery, SchemaEnumerator};
use maxvalue_check::error::{Error, Result};
use maxvalue_check::model::{ColumnSpec, ScanTask};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Canned answer for one `MAX()` query.
#[derive(Debug, Clone)]
pub enum Answer {
    Value(Option<i128>),
    Fail(String),
}

/// Connection factory answering `MAX()` queries from a map keyed by
/// `schema.table.column`.
#[derive(Default)]
pub struct FakeFactory {
    answers: Arc<HashMap<String, Answer>>,
    pub connections: AtomicUsize,
    pub refuse: bool,
}

impl FakeFactory {
    pub fn new(answers: &[(&str, Answer)]) -> Self {
        Self {
            answers: Arc::new(
                answers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            ),
            connections: AtomicUsize::new(0),
            refuse: false,
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Default::default()
        }
    }
}

impl ConnectionFactory for FakeFactory {
    fn connect(&self) -> Result<Box<dyn ScalarQuery>> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(Error::Connection(diesel::ConnectionError::BadConnection(
                "connection refused".to_string(),
            )));
        }
        Ok(Box::new(FakeConnection {
            answers: Arc::clone(&self.answers),
        }))
    }
}

struct FakeConnection {
    answers: Arc<HashMap<String, Answer>>,
}

impl ScalarQuery for FakeConnection {
    fn query_scalar(&mut self, sql: &str, _unsigned: bool) -> Result<Option<i128>> {
        // SELECT MAX(`col`) FROM `schema`.`table`
        let idents: Vec<&str> = sql.split('`').skip(1).step_by(2).collect();
        let key = match idents.as_slice() {
            [column, schema, table] => format!("{}.{}.{}", schema, table, column),
            _ => return Err(Error::Enumeration(format!("unexpected query: {}", sql))),
        };
        match self.answers.get(&key) {
            Some(Answer::Value(v)) => Ok(*v),
            Some(Answer::Fail(msg)) => Err(Error::Query(
                diesel::result::Error::QueryBuilderError(msg.clone().into()),
            )),
            None => Ok(None),
        }
    }
}

pub struct FakeEnumerator {
    pub result: std::result::Result<Vec<ScanTask>, String>,
}

impl SchemaEnumerator for FakeEnumerator {
    fn enumerate(&self, _filter: &EnumerationFilter) -> Result<Vec<ScanTask>> {
        self.result.clone().map_err(Error::Enumeration)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub rows: Vec<ResultRow>,
}

impl ResultsStore for MemoryStore {
    fn insert(&mut self, row: &ResultRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

pub fn task(schema: &str, table: &str, row_count: i64, columns: &[(&str, &str)]) -> ScanTask {
    ScanTask {
        schema: schema.to_string(),
        table: table.to_string(),
        row_count,
        columns: columns
            .iter()
            .map(|(name, declared_type)| ColumnSpec {
                schema: schema.to_string(),
                table: table.to_string(),
                name: name.to_string(),
                declared_type: declared_type.to_string(),
            })
            .collect(),
    }
}
