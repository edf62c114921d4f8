use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PricePoint: one repaired row of the loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PricePoint {
    /// Canonical (uppercase) coin identifier.
    pub coin_id: String,
    pub date: NaiveDate,
    pub price: f64,
    pub total_volume: f64,
    pub market_cap: f64,
}

impl PricePoint {
    pub fn new(
        coin_id: impl Into<String>,
        date: NaiveDate,
        price: f64,
        total_volume: f64,
        market_cap: f64,
    ) -> Self {
        Self {
            coin_id: canonical_coin_id(&coin_id.into()),
            date,
            price,
            total_volume,
            market_cap,
        }
    }

    /// `total_volume / market_cap`, or `None` when the market cap is zero or
    /// the quotient overflows.
    pub fn volume_to_marketcap_ratio(&self) -> Option<f64> {
        if self.market_cap == 0.0 {
            return None;
        }
        let ratio = self.total_volume / self.market_cap;
        ratio.is_finite().then_some(ratio)
    }
}

/// Normalize a coin name for matching and grouping.
pub fn canonical_coin_id(name: &str) -> String {
    name.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// SeriesPoint: (date, price) pair used for charting a coin over a year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl From<&PricePoint> for SeriesPoint {
    fn from(p: &PricePoint) -> Self {
        Self {
            date: p.date,
            price: p.price,
        }
    }
}
