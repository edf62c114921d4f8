//! One coin's rows between two dates, with the price change over the window.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{CryptoStatsError, Result};
use crate::models::{canonical_coin_id, RangeQueryResult, RangeRow};
use crate::series::percent_change;
use crate::table::Table;

use super::{parse_date, required};

// ---------------------------------------------------------------------------
// RangeParams
// ---------------------------------------------------------------------------

/// Request payload for the range query: `{coin_name, start_date, end_date}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeParams {
    pub coin_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RangeParams {
    /// Check that every field is present and that both dates parse.
    ///
    /// Returns the canonical coin id with the start and end dates.
    pub fn resolve(&self) -> Result<(String, NaiveDate, NaiveDate)> {
        let coin = required(&self.coin_name, "coin_name")?;
        let start = required(&self.start_date, "start_date")?;
        let end = required(&self.end_date, "end_date")?;
        Ok((
            canonical_coin_id(coin),
            parse_date("start_date", start)?,
            parse_date("end_date", end)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// RangeQuery
// ---------------------------------------------------------------------------

/// Query interface for a single coin over an inclusive date window.
pub struct RangeQuery<'a> {
    table: &'a Table,
}

impl<'a> RangeQuery<'a> {
    /// Create a new `RangeQuery` bound to the given table.
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Validate `params` and run [`query`](Self::query).
    pub fn run(&self, params: &RangeParams) -> Result<RangeQueryResult> {
        let (coin, start, end) = params.resolve()?;
        self.query(&coin, start, end)
    }

    /// Rows of `coin` dated within `[start, end]`, in date order.
    ///
    /// The coin is matched case-insensitively. `percent_change` is `None`
    /// when the first price in the window is zero. A window with no rows
    /// (including `start > end`) is a [`CryptoStatsError::NoDataFound`].
    pub fn query(&self, coin: &str, start: NaiveDate, end: NaiveDate) -> Result<RangeQueryResult> {
        let coin_id = canonical_coin_id(coin);

        let mut matched: Vec<_> = self
            .table
            .rows()
            .iter()
            .filter(|r| r.coin_id == coin_id && r.date >= start && r.date <= end)
            .collect();

        // Stable: rows sharing a date keep table order
        matched.sort_by_key(|r| r.date);

        let (first, last) = match (matched.first(), matched.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => {
                return Err(CryptoStatsError::NoDataFound(format!(
                    "No data found for {} in the given date range.",
                    coin_id
                )))
            }
        };

        tracing::debug!(coin = %coin_id, rows = matched.len(), "range query matched");

        Ok(RangeQueryResult {
            coin_id,
            start_date: start,
            end_date: end,
            initial_price: first.price,
            final_price: last.price,
            percent_change: percent_change(first.price, last.price),
            rows: matched
                .into_iter()
                .map(|p| RangeRow {
                    point: p.clone(),
                    volume_to_marketcap_ratio: p.volume_to_marketcap_ratio(),
                })
                .collect(),
        })
    }
}
