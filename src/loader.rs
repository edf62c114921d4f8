//! Dataset loader: reads the raw price CSV and repairs it into a typed [`Table`].
//!
//! Repair rules, applied in SQL while the data is still inside DuckDB:
//! - `coin_name` is trimmed and upper-cased (missing names become `""`)
//! - `price`, `total_volume` and `market_cap` default to `0.0` when absent or
//!   not numeric
//! - `date` defaults to [`EPOCH_DATE`] when absent or unparseable
//!
//! Non-finite numbers that DuckDB accepts (`nan`, `inf`) are zeroed after the
//! rows are read back.

use chrono::NaiveDate;
use std::path::Path;

use crate::cache::DatasetCache;
use crate::config::{DatasetConfig, CSV_COLUMNS, EPOCH_DATE};
use crate::connection::Connection;
use crate::error::{CryptoStatsError, Result};
use crate::models::PricePoint;
use crate::table::Table;

const RAW_TABLE: &str = "raw_prices";
const REPAIRED_TABLE: &str = "prices";

/// Loads the price table described by a [`DatasetConfig`].
///
/// Every call to [`load`](Self::load) re-reads the dataset into a fresh
/// in-memory DuckDB database; nothing is shared between loads except the
/// download cache for remote sources.
pub struct DatasetLoader {
    config: DatasetConfig,
    cache: DatasetCache,
}

impl DatasetLoader {
    pub fn new(config: DatasetConfig) -> Self {
        let cache = DatasetCache::new(config.cache_dir.clone(), config.offline, config.timeout);
        Self { config, cache }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Read and repair the dataset.
    ///
    /// Fails with [`CryptoStatsError::DataUnavailable`] when the file cannot be
    /// found, downloaded or parsed as CSV, or lacks one of the required columns.
    pub fn load(&self) -> Result<Table> {
        let path = self.cache.resolve(&self.config.source)?;
        load_csv(&path)
    }
}

/// Load and repair a CSV file directly, bypassing source resolution.
pub fn load_csv(path: &Path) -> Result<Table> {
    let conn = Connection::open_in_memory()?;

    conn.register_table_from_csv(RAW_TABLE, path).map_err(|e| {
        CryptoStatsError::DataUnavailable(format!("cannot read {}: {}", path.display(), e))
    })?;
    check_columns(&conn, path)?;

    log_null_counts(&conn, RAW_TABLE, "null values before repair")?;
    log_unparseable_dates(&conn)?;

    conn.raw()
        .execute_batch(&format!("CREATE TABLE {} AS {}", REPAIRED_TABLE, repair_sql()))?;

    log_null_counts(&conn, REPAIRED_TABLE, "null values after repair")?;

    let rows = read_rows(&conn)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "dataset loaded");
    Ok(Table::new(rows))
}

fn check_columns(conn: &Connection, path: &Path) -> Result<()> {
    let present = conn.columns(RAW_TABLE)?;
    let missing: Vec<&str> = CSV_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.iter().any(|p| p == c))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CryptoStatsError::DataUnavailable(format!(
            "{} is missing required column(s): {}",
            path.display(),
            missing.join(", ")
        )))
    }
}

/// Projection that turns the all-VARCHAR raw table into typed, null-free rows.
fn repair_sql() -> String {
    format!(
        r#"
        SELECT
            UPPER(TRIM(COALESCE("coin_name", ''))) AS coin_id,
            CAST(COALESCE(
                TRY_CAST(TRY_CAST(TRIM("date") AS TIMESTAMP) AS DATE),
                DATE '{epoch}'
            ) AS VARCHAR) AS "date",
            COALESCE(TRY_CAST("price" AS DOUBLE), 0.0) AS price,
            COALESCE(TRY_CAST("total_volume" AS DOUBLE), 0.0) AS total_volume,
            COALESCE(TRY_CAST("market_cap" AS DOUBLE), 0.0) AS market_cap
        FROM {raw}
        "#,
        epoch = EPOCH_DATE,
        raw = RAW_TABLE
    )
}

fn log_null_counts(conn: &Connection, table: &str, message: &str) -> Result<()> {
    let columns = conn.columns(table)?;
    if columns.is_empty() {
        return Ok(());
    }
    let exprs: Vec<String> = columns
        .iter()
        .map(|c| format!("COUNT(*) - COUNT(\"{c}\") AS \"{c}\""))
        .collect();
    let sql = format!("SELECT {} FROM {}", exprs.join(", "), table);

    if let Some(row) = conn.execute(&sql)?.into_iter().next() {
        for col in &columns {
            let nulls = row.get(col).and_then(|v| v.as_i64()).unwrap_or(0);
            tracing::info!(table, column = %col, nulls, "{}", message);
        }
    }
    Ok(())
}

fn log_unparseable_dates(conn: &Connection) -> Result<()> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} \
         WHERE \"date\" IS NOT NULL AND TRY_CAST(TRIM(\"date\") AS TIMESTAMP) IS NULL",
        RAW_TABLE
    );
    let bad = conn
        .execute_scalar(&sql)?
        .and_then(|v| v.as_i64())
        .unwrap_or(0);
    if bad > 0 {
        tracing::warn!(rows = bad, fallback = EPOCH_DATE, "unparseable dates replaced");
    }
    Ok(())
}

fn read_rows(conn: &Connection) -> Result<Vec<PricePoint>> {
    let epoch = epoch();
    let mut stmt = conn.raw().prepare(&format!(
        "SELECT coin_id, \"date\", price, total_volume, market_cap FROM {}",
        REPAIRED_TABLE
    ))?;

    let mapped = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, f64>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, f64>(4)?,
        ))
    })?;

    let mut rows = Vec::new();
    let mut non_finite = 0usize;
    for item in mapped {
        let (coin_id, date, price, total_volume, market_cap) = item?;
        let mut finite = |v: f64| {
            if v.is_finite() {
                v
            } else {
                non_finite += 1;
                0.0
            }
        };
        rows.push(PricePoint {
            coin_id,
            date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap_or(epoch),
            price: finite(price),
            total_volume: finite(total_volume),
            market_cap: finite(market_cap),
        });
    }

    if non_finite > 0 {
        tracing::warn!(values = non_finite, "non-finite numbers replaced with 0");
    }
    Ok(rows)
}

fn epoch() -> NaiveDate {
    NaiveDate::parse_from_str(EPOCH_DATE, "%Y-%m-%d").unwrap_or_default()
}
