//! Maximum representable values of the MySQL integer types.

use crate::error::{Error, Result};

/// Integer base types with known capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntType {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
}

impl IntType {
    pub fn parse(base_type: &str) -> Result<Self> {
        match base_type {
            "tinyint" => Ok(IntType::TinyInt),
            "smallint" => Ok(IntType::SmallInt),
            "mediumint" => Ok(IntType::MediumInt),
            "int" => Ok(IntType::Int),
            "bigint" => Ok(IntType::BigInt),
            other => Err(Error::UnknownType(other.to_string())),
        }
    }

    /// Capacity as `f64` so ratio arithmetic never overflows.
    pub fn capacity(self, unsigned: bool) -> f64 {
        match (self, unsigned) {
            (IntType::TinyInt, false) => 127.0,
            (IntType::SmallInt, false) => 32767.0,
            (IntType::MediumInt, false) => 8388607.0,
            (IntType::Int, false) => 2147483647.0,
            (IntType::BigInt, false) => 9223372036854775807.0,
            (IntType::TinyInt, true) => 255.0,
            (IntType::SmallInt, true) => 65535.0,
            (IntType::MediumInt, true) => 16777215.0,
            (IntType::Int, true) => 4294967295.0,
            (IntType::BigInt, true) => 18446744073709551615.0,
        }
    }
}

pub fn capacity_of(base_type: &str, unsigned: bool) -> Result<f64> {
    Ok(IntType::parse(base_type)?.capacity(unsigned))
}

/// Splits a raw `COLUMN_TYPE` into its base type name and signedness.
///
/// `int(10) unsigned` yields `("int", true)`; `bigint(20)` yields
/// `("bigint", false)`. Servers that omit the display width report
/// `bigint unsigned`, so the name also ends at the first space.
pub fn parse_declared_type(declared_type: &str) -> (&str, bool) {
    let unsigned = declared_type.contains("unsigned");
    let base = declared_type
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or(declared_type);
    (base, unsigned)
}
