//! Query modules for the price table.
//!
//! Each module provides a query struct that borrows from a [`Table`](crate::table::Table)
//! and exposes pure methods returning typed results from [`crate::models`].
//! Request payload structs (`*Params`) live next to the query they feed.

pub mod range;
pub mod snapshot;
pub mod summary;
pub mod yearly;

pub use range::{RangeParams, RangeQuery};
pub use snapshot::{SnapshotParams, SnapshotQuery};
pub use summary::SummaryQuery;
pub use yearly::{YearInput, YearParams, YearlyQuery};

use chrono::NaiveDate;

use crate::error::{CryptoStatsError, Result};

/// Return the trimmed value of a required field; blank counts as missing.
pub(crate) fn required<'p>(value: &'p Option<String>, field: &str) -> Result<&'p str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(CryptoStatsError::MissingField(field.to_string())),
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        CryptoStatsError::InvalidArgument(format!(
            "{} must be a date in YYYY-MM-DD format, got '{}'",
            field, value
        ))
    })
}
