//! Whole-table summary and the coin directory.

use std::collections::BTreeSet;

use crate::models::SummaryStats;
use crate::series::mean;
use crate::table::Table;

// ---------------------------------------------------------------------------
// SummaryQuery
// ---------------------------------------------------------------------------

/// Query interface for statistics spanning the entire table.
pub struct SummaryQuery<'a> {
    table: &'a Table,
}

impl<'a> SummaryQuery<'a> {
    /// Create a new `SummaryQuery` bound to the given table.
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Count distinct coins and average the price over every row.
    ///
    /// Each row weighs the same regardless of coin or date. An empty table
    /// reports an average of `0.0`.
    pub fn summarize(&self) -> SummaryStats {
        let prices: Vec<f64> = self.table.rows().iter().map(|r| r.price).collect();
        SummaryStats {
            total_coins: self.table.coin_ids().len(),
            average_price: mean(&prices).unwrap_or(0.0),
        }
    }

    /// All distinct coin ids, sorted lexicographically.
    pub fn coin_names(&self) -> Vec<String> {
        self.table
            .rows()
            .iter()
            .map(|r| r.coin_id.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
