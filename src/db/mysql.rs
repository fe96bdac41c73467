use super::{ConnectionFactory, ScalarQuery};
use crate::error::Result;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Unsigned};
use tracing::debug;

pub fn establish_connection(database_url: &str) -> Result<MysqlConnection> {
    Ok(MysqlConnection::establish(database_url)?)
}

#[derive(Debug, QueryableByName)]
struct SignedRow {
    #[diesel(sql_type = Nullable<BigInt>)]
    value: Option<i64>,
}

#[derive(Debug, QueryableByName)]
struct UnsignedRow {
    #[diesel(sql_type = Nullable<Unsigned<BigInt>>)]
    value: Option<u64>,
}

/// Scalar queries over a dedicated MySQL connection.
pub struct MysqlScalarQuery {
    connection: MysqlConnection,
}

impl MysqlScalarQuery {
    pub fn new(connection: MysqlConnection) -> Self {
        Self { connection }
    }
}

impl ScalarQuery for MysqlScalarQuery {
    fn query_scalar(&mut self, sql: &str, unsigned: bool) -> Result<Option<i128>> {
        // Wrapping as a scalar subquery gives the column a stable name.
        let query = diesel::sql_query(format!("SELECT ({}) AS value", sql));
        let value = if unsigned {
            query
                .get_result::<UnsignedRow>(&mut self.connection)
                .optional()?
                .and_then(|r| r.value)
                .map(i128::from)
        } else {
            query
                .get_result::<SignedRow>(&mut self.connection)
                .optional()?
                .and_then(|r| r.value)
                .map(i128::from)
        };
        Ok(value)
    }
}

/// Opens one MySQL connection per call from a fixed URL.
#[derive(Debug, Clone)]
pub struct MysqlConnectionFactory {
    database_url: String,
}

impl MysqlConnectionFactory {
    pub fn new(database_url: String) -> Self {
        Self { database_url }
    }
}

impl ConnectionFactory for MysqlConnectionFactory {
    fn connect(&self) -> Result<Box<dyn ScalarQuery>> {
        debug!("Opening scan connection");
        let connection = establish_connection(&self.database_url)?;
        Ok(Box::new(MysqlScalarQuery::new(connection)))
    }
}
