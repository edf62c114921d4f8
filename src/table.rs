//! The in-memory price table produced by the dataset loader.

use chrono::Datelike;
use std::collections::HashSet;

use crate::models::PricePoint;
use crate::queries::{RangeQuery, SnapshotQuery, SummaryQuery, YearlyQuery};

/// Repaired, typed rows of the dataset.
///
/// Immutable once built; query interfaces borrow from it the same way they
/// would borrow from a connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<PricePoint>,
}

impl Table {
    pub fn new(rows: Vec<PricePoint>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PricePoint] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct coin ids in first-encountered order.
    pub fn coin_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| r.coin_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Rows dated within the given calendar year, in table order.
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = &PricePoint> {
        self.rows.iter().filter(move |r| r.date.year() == year)
    }

    // -- Query accessors ---------------------------------------------------

    /// Access the summary / coin directory query interface.
    pub fn summary(&self) -> SummaryQuery<'_> {
        SummaryQuery::new(self)
    }

    /// Access the date-range query interface.
    pub fn range(&self) -> RangeQuery<'_> {
        RangeQuery::new(self)
    }

    /// Access the snapshot-by-date query interface.
    pub fn snapshot(&self) -> SnapshotQuery<'_> {
        SnapshotQuery::new(self)
    }

    /// Access the per-year analytics (top movers, volatility, global mean).
    pub fn yearly(&self) -> YearlyQuery<'_> {
        YearlyQuery::new(self)
    }
}

impl From<Vec<PricePoint>> for Table {
    fn from(rows: Vec<PricePoint>) -> Self {
        Self::new(rows)
    }
}
