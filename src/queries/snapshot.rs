//! Cross-section of every coin's market cap on one date.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

use crate::error::{CryptoStatsError, Result};
use crate::models::{SnapshotResult, SnapshotRow};
use crate::table::Table;

use super::{parse_date, required};

/// Request payload for the snapshot query: `{date}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotParams {
    pub date: Option<String>,
}

impl SnapshotParams {
    pub fn resolve(&self) -> Result<NaiveDate> {
        parse_date("date", required(&self.date, "date")?)
    }
}

/// Query interface for per-date snapshots.
pub struct SnapshotQuery<'a> {
    table: &'a Table,
}

impl<'a> SnapshotQuery<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    pub fn run(&self, params: &SnapshotParams) -> Result<SnapshotResult> {
        self.by_date(params.resolve()?)
    }

    /// One row per coin observed on `date`, ascending by market cap.
    ///
    /// When a coin has several rows on that date the first one in table
    /// order wins; it is not aggregated.
    pub fn by_date(&self, date: NaiveDate) -> Result<SnapshotResult> {
        let mut seen = HashSet::new();
        let mut rows: Vec<SnapshotRow> = self
            .table
            .rows()
            .iter()
            .filter(|r| r.date == date)
            .filter(|r| seen.insert(r.coin_id.as_str()))
            .map(|r| SnapshotRow {
                coin_id: r.coin_id.clone(),
                market_cap: r.market_cap,
            })
            .collect();

        if rows.is_empty() {
            return Err(CryptoStatsError::NoDataFound(
                "No data found for the given date.".to_string(),
            ));
        }

        rows.sort_by(|a, b| a.market_cap.total_cmp(&b.market_cap));

        Ok(SnapshotResult { date, rows })
    }
}
