//! DuckDB connection wrapper used by the dataset loader.
//!
//! Each load opens its own in-memory database, registers the CSV as a table
//! and runs the repair projection against it.

use crate::error::Result;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// One result row keyed by column name.
pub type Row = HashMap<String, Value>;

/// Wraps an in-memory DuckDB connection.
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open a fresh in-memory DuckDB database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: DuckDbConnection::open_in_memory()?,
        })
    }

    /// Run a query and collect every row.
    ///
    /// Values are converted to JSON; temporal columns should be cast to
    /// VARCHAR in the query since they come back as `null` otherwise.
    pub fn execute(&self, sql: &str) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;

        // Column names are only known once the statement has run
        let names: Vec<String> = match rows.as_ref() {
            Some(s) => s.column_names().into_iter().map(String::from).collect(),
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                record.insert(name.clone(), to_json(row.get_ref(i)?));
            }
            out.push(record);
        }
        Ok(out)
    }

    /// First column of the first row, or `None` for an empty result.
    pub fn execute_scalar(&self, sql: &str) -> Result<Option<Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(to_json(row.get_ref(0)?))),
            None => Ok(None),
        }
    }

    /// Create (or replace) a table from a CSV file with a header row.
    ///
    /// Every column is read as VARCHAR so that type repair happens in SQL
    /// instead of failing inside the CSV sniffer.
    pub fn register_table_from_csv(&self, table: &str, csv_path: &Path) -> Result<()> {
        let path = csv_path
            .to_string_lossy()
            .replace('\\', "/")
            .replace('\'', "''");
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {table} AS \
             SELECT * FROM read_csv('{path}', header = true, all_varchar = true)"
        ))?;
        Ok(())
    }

    /// Column names of a table, in declaration order.
    pub fn columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT column_name FROM (DESCRIBE {table})"))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// The underlying DuckDB connection, for prepared statements.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn to_json(val: ValueRef<'_>) -> Value {
    let float = |f: f64| serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number);
    match val {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(n) => n.into(),
        ValueRef::SmallInt(n) => n.into(),
        ValueRef::Int(n) => n.into(),
        ValueRef::BigInt(n) => n.into(),
        ValueRef::UBigInt(n) => n.into(),
        // COUNT(*) arrives as HUGEINT on some DuckDB versions
        ValueRef::HugeInt(n) => i64::try_from(n).map_or_else(|_| Value::String(n.to_string()), Value::from),
        ValueRef::Float(f) => float(f64::from(f)),
        ValueRef::Double(f) => float(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        _ => Value::Null,
    }
}
