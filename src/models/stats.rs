use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::price::{PricePoint, SeriesPoint};

// ---------------------------------------------------------------------------
// SummaryStats: whole-table overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_coins: usize,
    /// Row-wise mean price; `0.0` for an empty table.
    pub average_price: f64,
}

// ---------------------------------------------------------------------------
// RangeQueryResult: one coin over a date window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRow {
    #[serde(flatten)]
    pub point: PricePoint,
    /// `null` when the row's market cap is zero.
    pub volume_to_marketcap_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQueryResult {
    pub coin_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_price: f64,
    pub final_price: f64,
    /// `null` when the initial price is zero.
    pub percent_change: Option<f64>,
    pub rows: Vec<RangeRow>,
}

// ---------------------------------------------------------------------------
// SnapshotResult: market caps of every coin on one date
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub coin_id: String,
    pub market_cap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotResult {
    pub date: NaiveDate,
    pub rows: Vec<SnapshotRow>,
}

// ---------------------------------------------------------------------------
// Yearly results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMove {
    pub coin_id: String,
    pub percent_change: f64,
    pub price_series: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRankingResult {
    pub year: i32,
    pub top_n: Vec<CoinMove>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDeviation {
    pub coin_id: String,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinVolatility {
    pub coin_id: String,
    pub std_dev: f64,
    pub price_series: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityExtremesResult {
    pub year: i32,
    pub most_volatile: CoinVolatility,
    pub most_stable: CoinVolatility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMean {
    pub coin_id: String,
    pub mean_price: f64,
    pub price_series: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboveMeanResult {
    pub year: i32,
    /// Mean of the per-coin means, not of all rows.
    pub global_mean: f64,
    pub coins: Vec<CoinMean>,
}

/// Stability pick and above-mean coins for one year, in a single response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOverviewResult {
    pub year: i32,
    pub most_stable: CoinDeviation,
    pub global_mean: f64,
    pub coins: Vec<CoinMean>,
}
