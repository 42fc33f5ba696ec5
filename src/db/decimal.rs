//! Decimal column mapping
//!
//! Quantities and nutrient values are stored as TEXT so that no precision is
//! lost between writes and reads.

use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// A `Decimal` that can be bound to and read from SQLite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlDecimal(pub Decimal);

impl ToSql for SqlDecimal {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.normalize().to_string()))
    }
}

impl FromSql for SqlDecimal {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))?;
                Decimal::from_str(text.trim())
                    .map(SqlDecimal)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Integer(i) => Ok(SqlDecimal(Decimal::from(i))),
            ValueRef::Real(f) => Decimal::from_f64(f)
                .map(SqlDecimal)
                .ok_or(FromSqlError::InvalidType),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl From<SqlDecimal> for Decimal {
    fn from(value: SqlDecimal) -> Self {
        value.0
    }
}

/// Read a nullable decimal column by name
pub fn get_opt(row: &rusqlite::Row, column: &str) -> rusqlite::Result<Option<Decimal>> {
    Ok(row.get::<_, Option<SqlDecimal>>(column)?.map(Decimal::from))
}

/// Read a non-null decimal column by name
pub fn get(row: &rusqlite::Row, column: &str) -> rusqlite::Result<Decimal> {
    Ok(row.get::<_, SqlDecimal>(column)?.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_decimal_text_round_trip_keeps_precision() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE t (v TEXT)", []).unwrap();
        let value: Decimal = "0.1234567890123456789".parse().unwrap();
        conn.execute("INSERT INTO t (v) VALUES (?1)", [SqlDecimal(value)]).unwrap();

        let read: Decimal = conn
            .query_row("SELECT v FROM t", [], |row| get(row, "v"))
            .unwrap();
        assert_eq!(read, value);
    }

    #[test]
    fn test_reads_numeric_storage_classes() {
        let conn = Connection::open_in_memory().unwrap();
        let int: Decimal = conn.query_row("SELECT 12 AS v", [], |row| get(row, "v")).unwrap();
        assert_eq!(int, Decimal::from(12));

        let real: Decimal = conn.query_row("SELECT 2.5 AS v", [], |row| get(row, "v")).unwrap();
        assert_eq!(real, Decimal::new(25, 1));

        let null: Option<Decimal> = conn.query_row("SELECT NULL AS v", [], |row| get_opt(row, "v")).unwrap();
        assert_eq!(null, None);
    }
}
